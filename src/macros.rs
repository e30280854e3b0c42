/// Builds a [`Table`](crate::Table) or a named [`Value`](crate::Value) from a JSON-like literal.
///
/// - `vdf!({ "key": value, ... })` evaluates to `Result<Table>`
/// - `vdf!("name", { ... })` evaluates to `Result<Value>` holding a table
/// - `vdf!("name", scalar)` evaluates to `Result<Value>` holding a scalar
///
/// Scalars are any expression convertible into a [`Kind`](crate::Kind).
/// Nested `{ ... }` become nested tables. A repeated key yields
/// [`Error::DuplicateName`](crate::Error::DuplicateName). Negative literals
/// inside a table need parentheses: `"offset": (-1)`.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{to_string, vdf};
///
/// let config = vdf!("config", {
///     "retries": 3,
///     "name": "hi",
///     "limits": { "cpu": 0.5, "offset": (-1) }
/// })
/// .unwrap();
///
/// assert_eq!(
///     to_string(&config),
///     "\"config\"\n{\n  \"retries\" \"3\"\n  \"name\" \"hi\"\n  \"limits\"\n  {\n    \"cpu\" \"0.5\"\n    \"offset\" \"-1\"\n  }\n}\n"
/// );
/// ```
#[macro_export]
macro_rules! vdf {
    (@child $key:literal, { $($body:tt)* }) => {
        $crate::Value::table($key, $crate::vdf!({ $($body)* })?)
    };

    (@child $key:literal, $value:expr) => {
        $crate::Value::new($key, $value)
    };

    // Handle empty table
    ({}) => {
        $crate::Result::<$crate::Table>::Ok($crate::Table::new())
    };

    // Handle non-empty table
    ({ $($key:literal : $value:tt),* $(,)? }) => {
        (|| -> $crate::Result<$crate::Table> {
            let mut table = $crate::Table::new();
            $(
                table.add($crate::vdf!(@child $key, $value))?;
            )*
            ::core::result::Result::Ok(table)
        })()
    };

    // Named table
    ($name:expr, { $($body:tt)* }) => {
        $crate::vdf!({ $($body)* }).map(|table| $crate::Value::table($name, table))
    };

    // Named scalar
    ($name:expr, $value:expr) => {
        $crate::Result::<$crate::Value>::Ok($crate::Value::new($name, $value))
    };
}
