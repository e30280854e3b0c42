//! The VDF value tree.
//!
//! This module provides [`Value`], a named node carrying comment lines and a
//! [`Kind`]: one of the four scalar kinds or a nested [`Table`].
//!
//! ## Core Types
//!
//! - [`Value`]: a named node (name, comments, kind)
//! - [`Kind`]: String, Token, Integer, Double or Table
//! - [`ChildMut`]: mutable access to a child that is attached to a table
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_vdf::{Kind, Table, Value};
//!
//! let text = Value::string("name", "hi");
//! let token = Value::token("material", "base_texture");
//! let count = Value::integer("retries", 3);
//! let ratio = Value::double("scale", 0.5);
//! let config = Value::table("config", Table::new());
//!
//! // From any type that converts into a Kind
//! let generic = Value::new("port", 8080);
//! assert_eq!(generic.kind(), &Kind::Integer(8080));
//! ```
//!
//! ### Comments
//!
//! ```rust
//! use serde_vdf::Value;
//!
//! let value = Value::integer("retries", 3).with_comment("how often to retry");
//! assert_eq!(value.to_string(), "//how often to retry\n\"retries\" \"3\"\n");
//! ```
//!
//! ## Ownership
//!
//! A value is attached to a table by moving it in and detached by moving it out
//! again ([`Table::remove`], [`Table::remove_at`], [`Table::set`]). Ownership is
//! the parent relation: a value can never sit in two tables, and no back pointer
//! exists that could outlive its table. Children are mutated through
//! [`ChildMut`], which does not allow renaming; [`Table::rename`] does.

use crate::Table;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::Deref;

/// The content of a [`Value`].
///
/// A closed set: the serializer, parser and serde bridge match on it exhaustively.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::Kind;
///
/// assert_eq!(Kind::from("text"), Kind::String("text".to_string()));
/// assert_eq!(Kind::from(42), Kind::Integer(42));
/// assert_eq!(Kind::from(0.5), Kind::Double(0.5));
/// assert_eq!(Kind::Integer(1).type_name(), "integer");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// Quoted text
    String(String),
    /// Symbolic reference, written as `[$...]`
    Token(String),
    /// 64-bit signed integer
    Integer(i64),
    /// IEEE-754 double
    Double(f64),
    /// Ordered, name-indexed children
    Table(Table),
}

impl Kind {
    /// Returns a lowercase name for this kind, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Kind::String(_) => "string",
            Kind::Token(_) => "token",
            Kind::Integer(_) => "integer",
            Kind::Double(_) => "double",
            Kind::Table(_) => "table",
        }
    }

    /// Returns `true` for every kind except [`Kind::Table`].
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Kind::Table(_))
    }
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        Kind::String(value.to_string())
    }
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        Kind::String(value)
    }
}

impl From<i8> for Kind {
    fn from(value: i8) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<i16> for Kind {
    fn from(value: i16) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<i32> for Kind {
    fn from(value: i32) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<i64> for Kind {
    fn from(value: i64) -> Self {
        Kind::Integer(value)
    }
}

impl From<u8> for Kind {
    fn from(value: u8) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<u32> for Kind {
    fn from(value: u32) -> Self {
        Kind::Integer(value as i64)
    }
}

impl From<f32> for Kind {
    fn from(value: f32) -> Self {
        Kind::Double(value as f64)
    }
}

impl From<f64> for Kind {
    fn from(value: f64) -> Self {
        Kind::Double(value)
    }
}

impl From<Table> for Kind {
    fn from(value: Table) -> Self {
        Kind::Table(value)
    }
}

/// A named node of the VDF tree.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{Table, Value};
///
/// let mut table = Table::new();
/// table.add(Value::integer("retries", 3)).unwrap();
/// table.add(Value::string("name", "hi\"there")).unwrap();
///
/// let config = Value::table("config", table);
/// assert_eq!(
///     config.to_string(),
///     "\"config\"\n{\n  \"retries\" \"3\"\n  \"name\" \"hi\\\"there\"\n}\n"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    name: String,
    comments: Vec<String>,
    kind: Kind,
}

impl Value {
    /// Creates a detached value from anything that converts into a [`Kind`].
    pub fn new(name: impl Into<String>, kind: impl Into<Kind>) -> Self {
        Value {
            name: name.into(),
            comments: Vec::new(),
            kind: kind.into(),
        }
    }

    /// Creates a string value.
    pub fn string(name: impl Into<String>, content: impl Into<String>) -> Self {
        Value::new(name, Kind::String(content.into()))
    }

    /// Creates a token value, rendered as `[$content]`.
    ///
    /// The body may contain any text, including `]`.
    pub fn token(name: impl Into<String>, content: impl Into<String>) -> Self {
        Value::new(name, Kind::Token(content.into()))
    }

    /// Creates an integer value.
    pub fn integer(name: impl Into<String>, content: i64) -> Self {
        Value::new(name, Kind::Integer(content))
    }

    /// Creates a double value.
    pub fn double(name: impl Into<String>, content: f64) -> Self {
        Value::new(name, Kind::Double(content))
    }

    /// Creates a table value.
    pub fn table(name: impl Into<String>, table: Table) -> Self {
        Value::new(name, Kind::Table(table))
    }

    /// Returns the name of this value.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this value under a new name.
    ///
    /// Only detached values can be renamed this way; attached children are
    /// renamed with [`Table::rename`] so that the table index stays correct.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the comment lines rendered before this value.
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Returns the comment lines for editing.
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }

    /// Appends a comment line.
    pub fn add_comment(&mut self, line: impl Into<String>) {
        self.comments.push(line.into());
    }

    /// Returns this value with a comment line appended.
    #[must_use]
    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.add_comment(line);
        self
    }

    /// Returns the content of the value.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the content for in-place replacement; the name is unaffected.
    pub fn kind_mut(&mut self) -> &mut Kind {
        &mut self.kind
    }

    /// Consumes the value, returning its content.
    #[must_use]
    pub fn into_kind(self) -> Kind {
        self.kind
    }

    /// Splits the value into name, comments and content.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>, Kind) {
        (self.name, self.comments, self.kind)
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.kind, Kind::String(_))
    }

    /// Returns `true` if the value is a token.
    #[inline]
    #[must_use]
    pub const fn is_token(&self) -> bool {
        matches!(self.kind, Kind::Token(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self.kind, Kind::Integer(_))
    }

    /// Returns `true` if the value is a double.
    #[inline]
    #[must_use]
    pub const fn is_double(&self) -> bool {
        matches!(self.kind, Kind::Double(_))
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self.kind, Kind::Table(_))
    }

    /// If the value is a string, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Value;
    ///
    /// assert_eq!(Value::string("a", "hello").as_str(), Some("hello"));
    /// assert_eq!(Value::token("a", "hello").as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            Kind::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a token, returns its text. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match &self.kind {
            Kind::Token(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            Kind::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// If the value is numeric, returns it as a double. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Value;
    ///
    /// assert_eq!(Value::double("a", 0.5).as_f64(), Some(0.5));
    /// assert_eq!(Value::integer("a", 2).as_f64(), Some(2.0));
    /// assert_eq!(Value::string("a", "2").as_f64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            Kind::Double(f) => Some(f),
            Kind::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    /// If the value is a table, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            Kind::Table(t) => Some(t),
            _ => None,
        }
    }

    /// If the value is a table, returns a mutable reference to it. Otherwise returns `None`.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match &mut self.kind {
            Kind::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value in VDF notation, identical to [`crate::to_string`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::ser::Serializer::new(f).serialize(self)
    }
}

// Content only; comments are not part of the data model.
impl Serialize for Kind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Kind::String(s) | Kind::Token(s) => serializer.serialize_str(s),
            Kind::Integer(i) => serializer.serialize_i64(*i),
            Kind::Double(f) => serializer.serialize_f64(*f),
            Kind::Table(t) => t.serialize(serializer),
        }
    }
}

/// Serializes as a single-entry map from the value's name to its content.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::Value;
///
/// let value = Value::integer("retries", 3);
/// assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"retries":3}"#);
/// ```
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.kind)?;
        map.end()
    }
}

/// Mutable access to a child attached to a [`Table`].
///
/// Dereferences to the child for reading. Comments and content can be changed;
/// the name cannot, since the table indexes children by name.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{Kind, Table, Value};
///
/// let mut table = Table::new();
/// table.add(Value::integer("retries", 3)).unwrap();
///
/// let mut child = table.get_mut("retries").unwrap();
/// *child.kind_mut() = Kind::Integer(5);
/// child.add_comment("raised after outage");
///
/// assert_eq!(table.get("retries").unwrap().as_i64(), Some(5));
/// ```
#[derive(Debug)]
pub struct ChildMut<'a> {
    value: &'a mut Value,
}

impl<'a> ChildMut<'a> {
    pub(crate) fn new(value: &'a mut Value) -> Self {
        ChildMut { value }
    }

    /// Returns the child's content for in-place replacement.
    pub fn kind_mut(&mut self) -> &mut Kind {
        &mut self.value.kind
    }

    /// Returns the child's comment lines for editing.
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.value.comments
    }

    /// Appends a comment line to the child.
    pub fn add_comment(&mut self, line: impl Into<String>) {
        self.value.add_comment(line);
    }

    /// If the child is a table, returns a mutable reference to it.
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        self.value.as_table_mut()
    }

    /// Converts the guard into a mutable table reference with the guard's lifetime.
    pub fn into_table_mut(self) -> Option<&'a mut Table> {
        self.value.as_table_mut()
    }
}

impl Deref for ChildMut<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value
    }
}
