//! Ordered, name-indexed table of child values.
//!
//! This module provides [`Table`], the only composite kind of the VDF tree. A
//! table keeps its children in insertion order (which is the serialization
//! order) and indexes them by name for O(1) lookup.
//!
//! ## Why IndexMap?
//!
//! A single [`IndexMap`] is both the ordered sequence and the name index, so
//! the two can never disagree. Every key equals the `name` of the value stored
//! under it.
//!
//! ## Invariants
//!
//! - Child names are unique within one table. Adding, inserting, replacing or
//!   renaming to a name held by another child fails with
//!   [`Error::DuplicateName`].
//! - A failed operation leaves the table unchanged.
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{Table, Value};
//!
//! let mut table = Table::new();
//! table.add(Value::string("a", "1")).unwrap();
//! table.add(Value::string("b", "2")).unwrap();
//! table.add(Value::string("c", "3")).unwrap();
//!
//! let removed = table.remove("b").unwrap();
//! assert_eq!(removed.as_str(), Some("2"));
//!
//! let names: Vec<_> = table.names().collect();
//! assert_eq!(names, vec!["a", "c"]);
//! ```

use crate::value::ChildMut;
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered collection of uniquely named child values.
///
/// Equality compares children pairwise in order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    children: IndexMap<String, Value>,
}

impl Table {
    /// Creates an empty `Table`.
    #[must_use]
    pub fn new() -> Self {
        Table {
            children: IndexMap::new(),
        }
    }

    /// Creates an empty `Table` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            children: IndexMap::with_capacity(capacity),
        }
    }

    /// Builds a table from values, failing on the first duplicate name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{Table, Value};
    ///
    /// let table = Table::from_values([Value::integer("x", 1), Value::integer("y", 2)]).unwrap();
    /// assert_eq!(table.len(), 2);
    ///
    /// let dup = Table::from_values([Value::integer("x", 1), Value::integer("x", 2)]);
    /// assert!(dup.is_err());
    /// ```
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut table = Table::new();
        for value in values {
            table.add(value)?;
        }
        Ok(table)
    }

    /// Appends a child at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a child with the same name exists.
    pub fn add(&mut self, value: Value) -> Result<()> {
        if self.children.contains_key(value.name()) {
            return Err(Error::duplicate_name(value.name()));
        }
        self.children.insert(value.name().to_string(), value);
        Ok(())
    }

    /// Inserts a child at `index`, shifting later children back.
    ///
    /// `index` may equal [`Table::len`], which appends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`, and
    /// [`Error::DuplicateName`] if a child with the same name exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add(Value::integer("a", 1)).unwrap();
    /// table.add(Value::integer("c", 3)).unwrap();
    /// table.insert(1, Value::integer("b", 2)).unwrap();
    ///
    /// assert_eq!(table.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    /// assert!(table.insert(9, Value::integer("z", 0)).is_err());
    /// ```
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.children.len();
        if index > len {
            return Err(Error::index_out_of_range(index, len));
        }
        if self.children.contains_key(value.name()) {
            return Err(Error::duplicate_name(value.name()));
        }
        self.children
            .shift_insert(index, value.name().to_string(), value);
        Ok(())
    }

    /// Removes and returns the child at `index`, detaching it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<Value> {
        let len = self.children.len();
        self.children
            .shift_remove_index(index)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    /// Removes and returns the child called `name`, detaching it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no child has that name.
    pub fn remove(&mut self, name: &str) -> Result<Value> {
        self.children
            .shift_remove(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    /// Returns the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_index(&self, index: usize) -> Result<&Value> {
        self.children
            .get_index(index)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::index_out_of_range(index, self.children.len()))
    }

    /// Returns mutable access to the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_index_mut(&mut self, index: usize) -> Result<ChildMut<'_>> {
        let len = self.children.len();
        self.children
            .get_index_mut(index)
            .map(|(_, value)| ChildMut::new(value))
            .ok_or_else(|| Error::index_out_of_range(index, len))
    }

    /// Replaces the child at `index`, returning the previous (now detached) child.
    ///
    /// The name index follows the new child's name. The new name may equal the
    /// replaced child's name but no other child's.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`, and
    /// [`Error::DuplicateName`] if another child already has the new name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add(Value::integer("a", 1)).unwrap();
    /// table.add(Value::integer("b", 2)).unwrap();
    ///
    /// let old = table.set(0, Value::integer("z", 26)).unwrap();
    /// assert_eq!(old.name(), "a");
    /// assert!(!table.contains_name("a"));
    /// assert_eq!(table.position("z"), Some(0));
    ///
    /// assert!(table.set(0, Value::integer("b", 0)).is_err());
    /// ```
    pub fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        let len = self.children.len();
        let current = match self.children.get_index_of(value.name()) {
            Some(existing) if existing != index => {
                if index >= len {
                    return Err(Error::index_out_of_range(index, len));
                }
                return Err(Error::duplicate_name(value.name()));
            }
            found => found,
        };

        if current == Some(index) {
            let (_, slot) = self
                .children
                .get_index_mut(index)
                .ok_or_else(|| Error::index_out_of_range(index, len))?;
            return Ok(std::mem::replace(slot, value));
        }

        let (_, old) = self
            .children
            .shift_remove_index(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))?;
        self.children
            .shift_insert(index, value.name().to_string(), value);
        Ok(old)
    }

    /// Renames the child at `index`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`, and
    /// [`Error::DuplicateName`] if another child already has `new_name`.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<()> {
        let len = self.children.len();
        match self.children.get_index_of(new_name) {
            Some(existing) if existing == index => return Ok(()),
            Some(_) if index < len => return Err(Error::duplicate_name(new_name)),
            _ => {}
        }
        let (_, value) = self
            .children
            .shift_remove_index(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))?;
        self.children
            .shift_insert(index, new_name.to_string(), value.with_name(new_name));
        Ok(())
    }

    /// Returns the child called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no child has that name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{Error, Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.add(Value::integer("key", 42)).unwrap();
    /// assert_eq!(table.get("key").unwrap().as_i64(), Some(42));
    /// assert!(matches!(table.get("nope"), Err(Error::KeyNotFound { .. })));
    /// ```
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.children
            .get(name)
            .ok_or_else(|| Error::key_not_found(name))
    }

    /// Returns mutable access to the child called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no child has that name.
    pub fn get_mut(&mut self, name: &str) -> Result<ChildMut<'_>> {
        self.children
            .get_mut(name)
            .map(ChildMut::new)
            .ok_or_else(|| Error::key_not_found(name))
    }

    /// Returns the child called `name`, or `None`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Value> {
        self.children.get(name)
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the table has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if a child with the same name as `value` is present.
    ///
    /// Membership is by name, not by structural equality.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.contains_name(value.name())
    }

    /// Returns `true` if a child with this name exists.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Returns the position of the child named like `value`.
    #[must_use]
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.position(value.name())
    }

    /// Returns the position of the child called `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.get_index_of(name)
    }

    /// Removes all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Returns an iterator over the children, in insertion order.
    pub fn iter(&self) -> indexmap::map::Values<'_, String, Value> {
        self.children.values()
    }

    /// Returns an iterator over the child names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.keys().map(String::as_str)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for child in self {
            map.serialize_entry(child.name(), child.kind())?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Value;
    type IntoIter = indexmap::map::Values<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Table {
    type Item = Value;
    type IntoIter = indexmap::map::IntoValues<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_values()
    }
}

impl TryFrom<Vec<Value>> for Table {
    type Error = Error;

    fn try_from(values: Vec<Value>) -> Result<Self> {
        Table::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Table {
        Table::from_values([
            Value::integer("a", 1),
            Value::integer("b", 2),
            Value::integer("c", 3),
        ])
        .unwrap()
    }

    fn names(table: &Table) -> Vec<&str> {
        table.names().collect()
    }

    #[test]
    fn test_add_rejects_duplicate_and_keeps_state() {
        let mut table = abc();
        let err = table.add(Value::string("b", "other")).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref name } if name == "b"));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("b").unwrap().as_i64(), Some(2));
        assert_eq!(names(&table), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_bounds() {
        let mut table = abc();
        table.insert(3, Value::integer("d", 4)).unwrap();
        table.insert(0, Value::integer("z", 0)).unwrap();
        assert_eq!(names(&table), vec!["z", "a", "b", "c", "d"]);

        let err = table.insert(6, Value::integer("y", 0)).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 6, len: 5 }));

        let err = table.insert(1, Value::integer("c", 0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut table = abc();
        let b = table.remove("b").unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(names(&table), vec!["a", "c"]);
        assert_eq!(table.position("c"), Some(1));
        assert!(!table.contains(&b));

        assert!(matches!(table.remove("b"), Err(Error::KeyNotFound { .. })));

        let a = table.remove_at(0).unwrap();
        assert_eq!(a.name(), "a");
        assert!(matches!(
            table.remove_at(1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));

        // a removed child can be attached again
        table.add(a).unwrap();
        assert_eq!(names(&table), vec!["c", "a"]);
    }

    #[test]
    fn test_set_same_name_replaces_in_place() {
        let mut table = abc();
        let old = table.set(1, Value::string("b", "two")).unwrap();
        assert_eq!(old.as_i64(), Some(2));
        assert_eq!(table.get("b").unwrap().as_str(), Some("two"));
        assert_eq!(names(&table), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_set_new_name_updates_index() {
        let mut table = abc();
        let old = table.set(1, Value::integer("x", 9)).unwrap();
        assert_eq!(old.name(), "b");
        assert!(!table.contains_name("b"));
        assert_eq!(table.position("x"), Some(1));
        assert_eq!(names(&table), vec!["a", "x", "c"]);
    }

    #[test]
    fn test_set_errors_leave_table_unchanged() {
        let mut table = abc();
        assert!(matches!(
            table.set(0, Value::integer("c", 0)),
            Err(Error::DuplicateName { .. })
        ));
        assert!(matches!(
            table.set(3, Value::integer("q", 0)),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            table.set(5, Value::integer("a", 0)),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(table, abc());
    }

    #[test]
    fn test_rename() {
        let mut table = abc();
        table.rename(2, "see").unwrap();
        assert_eq!(names(&table), vec!["a", "b", "see"]);
        assert_eq!(table.get("see").unwrap().name(), "see");

        table.rename(0, "a").unwrap();
        assert!(matches!(
            table.rename(0, "b"),
            Err(Error::DuplicateName { .. })
        ));
        assert!(matches!(
            table.rename(7, "q"),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(names(&table), vec!["a", "b", "see"]);
    }

    #[test]
    fn test_get_index_and_lookup() {
        let table = abc();
        assert_eq!(table.get_index(2).unwrap().name(), "c");
        assert!(matches!(
            table.get_index(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(table.find("a").is_some());
        assert!(table.find("q").is_none());
        assert_eq!(table.index_of(&Value::string("c", "ignored")), Some(2));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let table = abc();
        let first: Vec<_> = table.iter().map(Value::name).collect();
        let second: Vec<_> = (&table).into_iter().map(Value::name).collect();
        assert_eq!(first, second);

        let owned: Vec<Value> = table.into_iter().collect();
        assert_eq!(owned.len(), 3);
    }

    #[test]
    fn test_equality_is_ordered() {
        let forward = abc();
        let backward = Table::from_values([
            Value::integer("c", 3),
            Value::integer("b", 2),
            Value::integer("a", 1),
        ])
        .unwrap();
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_clear() {
        let mut table = abc();
        table.clear();
        assert!(table.is_empty());
        table.add(Value::integer("a", 1)).unwrap();
        assert_eq!(table.len(), 1);
    }
}
