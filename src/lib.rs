//! # serde_vdf
//!
//! A library for the VDF text format (also known as KeyValues): a tree of named
//! values where each node is a quoted name followed by a quoted scalar, a
//! `[$token]`, or a brace-delimited table of children.
//!
//! ## What is VDF?
//!
//! ```text
//! //retry policy
//! "config"
//! {
//!   "retries" "3"
//!   "name" "hi\"there"
//!   "material" [$base_texture]
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Ordered, name-indexed tables**: children keep insertion order and are found by name in O(1)
//! - **Unique names**: duplicate names are an explicit [`Error::DuplicateName`], never a silent overwrite
//! - **Comments**: every value can carry `//` comment lines
//! - **Streaming output**: the same serializer writes to a `String`, any [`std::io::Write`], or a file
//! - **Encodings**: UTF-8 by default, UTF-8 with BOM or UTF-16 on request
//! - **Serde Compatible**: convert any `T: Serialize` into a tree and any tree into `T: Deserialize`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_vdf::{parse_str, to_string, Table, Value};
//!
//! let mut table = Table::new();
//! table.add(Value::integer("retries", 3)).unwrap();
//! table.add(Value::string("name", "hi\"there")).unwrap();
//! let config = Value::table("config", table);
//!
//! let text = to_string(&config);
//! assert_eq!(text, "\"config\"\n{\n  \"retries\" \"3\"\n  \"name\" \"hi\\\"there\"\n}\n");
//!
//! let back = parse_str(&text).unwrap();
//! assert_eq!(back, config);
//! ```
//!
//! ### Building values with the vdf! macro
//!
//! ```rust
//! use serde_vdf::vdf;
//!
//! let config = vdf!("config", {
//!     "retries": 3,
//!     "limits": { "cpu": 0.5 }
//! })
//! .unwrap();
//! assert_eq!(config.as_table().unwrap().len(), 2);
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_vdf::{from_str, to_string, to_value};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let server = Server { host: "localhost".to_string(), port: 27015 };
//! let text = to_string(&to_value("server", &server).unwrap());
//! assert_eq!(text, "\"server\"\n{\n  \"host\" \"localhost\"\n  \"port\" \"27015\"\n}\n");
//!
//! let back: Server = from_str(&text).unwrap();
//! assert_eq!(back, server);
//! ```
//!
//! ## Format Reference
//!
//! See the [`format`] module for the grammar and escaping rules.

pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod options;
pub mod ser;
pub mod table;
pub mod value;

pub use de::{unescape, Parser, ValueDeserializer};
pub use error::{Error, Result};
pub use options::{Encoding, VdfOptions};
pub use ser::{escape, IoSink, Serializer, Sink, ValueSerializer};
pub use table::Table;
pub use value::{ChildMut, Kind, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// Serialize a value tree to a VDF string.
///
/// Serialization cannot fail.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{to_string, Value};
///
/// assert_eq!(to_string(&Value::string("name", "hi")), "\"name\" \"hi\"\n");
/// ```
#[must_use]
pub fn to_string(value: &Value) -> String {
    to_string_with_options(value, &VdfOptions::default())
}

/// Serialize a value tree to a VDF string with custom options.
#[must_use]
pub fn to_string_with_options(value: &Value, options: &VdfOptions) -> String {
    let mut output = String::with_capacity(256);
    let mut serializer = Serializer::with_options(&mut output, options);
    match serializer.serialize(value) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    output
}

/// Serialize a value tree to a writer as UTF-8.
///
/// Text is written as it is produced, without building the whole document
/// first. The writer is flushed at the end.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{to_writer, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::integer("n", 1)).unwrap();
/// assert_eq!(buffer, b"\"n\" \"1\"\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] with the writer's error, unmodified.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, &VdfOptions::default())
}

/// Serialize a value tree to a writer using the options' indent and encoding.
///
/// # Errors
///
/// Returns [`Error::Io`] with the writer's error, unmodified.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(writer: W, value: &Value, options: &VdfOptions) -> Result<()>
where
    W: io::Write,
{
    let mut sink = IoSink::new(writer, options.encoding);
    Serializer::with_options(&mut sink, options).serialize(value)?;
    sink.flush()?;
    Ok(())
}

/// Serialize a value tree to a file as UTF-8, replacing any existing content.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    to_file_with_encoding(path, value, Encoding::default())
}

/// Serialize a value tree to a file in the given encoding.
///
/// The file is closed on every exit path; the buffered output is flushed
/// explicitly so that late write errors are reported.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file_with_encoding<P: AsRef<Path>>(
    path: P,
    value: &Value,
    encoding: Encoding,
) -> Result<()> {
    let path = path.as_ref();
    log::debug!(
        "writing \"{}\" to {} as {}",
        value.name(),
        path.display(),
        encoding.as_str()
    );
    let file = File::create(path)?;
    let options = VdfOptions::default().with_encoding(encoding);
    to_writer_with_options(BufWriter::new(file), value, &options)
}

/// Parse VDF text into a value tree.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::parse_str;
///
/// let value = parse_str("\"name\" \"hi\"").unwrap();
/// assert_eq!(value.name(), "name");
/// assert_eq!(value.as_str(), Some("hi"));
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid VDF. Error messages include
/// line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(s: &str) -> Result<Value> {
    parse_str_with_options(s, &VdfOptions::default())
}

/// Parse VDF text into a value tree with custom options.
///
/// # Errors
///
/// Returns an error if the input is not valid VDF.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str_with_options(s: &str, options: &VdfOptions) -> Result<Value> {
    Parser::with_options(s, options).parse_document()
}

/// Parse VDF bytes, honouring a UTF-8 or UTF-16 byte order mark.
///
/// Bytes without a byte order mark are read as UTF-8.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::parse_slice;
///
/// let value = parse_slice(b"\xEF\xBB\xBF\"n\" \"1\"").unwrap();
/// assert_eq!(value.as_i64(), Some(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes cannot be decoded, or a parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(v: &[u8]) -> Result<Value> {
    parse_slice_with_options(v, &VdfOptions::default())
}

/// Parse VDF bytes with custom options.
///
/// The encoding still comes from the byte order mark; only the parsing
/// options (such as [`VdfOptions::with_infer_numbers`]) apply.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes cannot be decoded, or a parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice_with_options(v: &[u8], options: &VdfOptions) -> Result<Value> {
    let (encoding, bom_len) = Encoding::detect(v);
    let text = encoding.decode(&v[bom_len..])?;
    parse_str_with_options(&text, options)
}

/// Parse VDF from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails, the bytes cannot be decoded, or the text is not valid VDF.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(reader: R) -> Result<Value>
where
    R: io::Read,
{
    parse_reader_with_options(reader, &VdfOptions::default())
}

/// Parse VDF from an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if reading fails, the bytes cannot be decoded, or the text is not valid VDF.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader_with_options<R>(mut reader: R, options: &VdfOptions) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_slice_with_options(&bytes, options)
}

/// Parse a VDF file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid VDF.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    parse_file_with_options(path, &VdfOptions::default())
}

/// Parse a VDF file with custom options.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid VDF.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: &VdfOptions) -> Result<Value> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    parse_slice_with_options(&bytes, options)
}

/// Convert any `T: Serialize` into a value tree named `name`.
///
/// Mapping:
///
/// - `bool` → integer `0`/`1`; integers → integer; floats → double
/// - `char`, strings, unit enum variants → string; `()` → empty string
/// - structs and maps → table; `None` fields are left out
/// - sequences and tuples → table with children `"0"`, `"1"`, ...
/// - data-carrying enum variants → table with one child named after the variant
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{to_value, Kind};
///
/// let value = to_value("ports", &vec![80, 443]).unwrap();
/// let table = value.as_table().unwrap();
/// assert_eq!(table.get("1").unwrap().kind(), &Kind::Integer(443));
/// ```
///
/// # Errors
///
/// Returns an error for map keys that are not strings or integers, `u64`
/// values above `i64::MAX`, or maps with repeated keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(name: &str, value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let kind = ser::to_kind(value)?.unwrap_or_else(|| Kind::String(String::new()));
    Ok(Value::new(name, kind))
}

/// Deserialize an instance of type `T` from the content of a value.
///
/// The value's own name is ignored.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{from_value, parse_str};
/// use std::collections::BTreeMap;
///
/// let value = parse_str("\"ports\" { \"http\" \"80\" \"https\" \"443\" }").unwrap();
/// let ports: BTreeMap<String, u16> = from_value(&value).unwrap();
/// assert_eq!(ports["https"], 443);
/// ```
///
/// # Errors
///
/// Returns an error if the tree's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<'a, T>(value: &'a Value) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(ValueDeserializer::new(value.kind()))
}

/// Parse VDF text and deserialize the root value's content into `T`.
///
/// # Errors
///
/// Returns an error if the text is not valid VDF or its shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = parse_str(s)?;
    from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        nickname: Option<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&to_value("point", &point).unwrap());
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            nickname: None,
        };

        let value = to_value("user", &user).unwrap();
        let table = value.as_table().unwrap();
        assert!(!table.contains_name("nickname"));
        assert_eq!(table.get("active").unwrap().as_i64(), Some(1));

        let text = to_string(&value);
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_numeric_looking_strings_survive() {
        let user = User {
            id: 1,
            name: "42".to_string(),
            active: false,
            tags: vec!["0.5".to_string()],
            nickname: Some("7".to_string()),
        };
        let text = to_string(&to_value("user", &user).unwrap());
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_writer_matches_string() {
        let value = to_value("point", &Point { x: -3, y: 4 }).unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &value).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), to_string(&value));
    }

    #[test]
    fn test_display_matches_to_string() {
        let value = to_value("point", &Point { x: 0, y: 0 }).unwrap();
        assert_eq!(value.to_string(), to_string(&value));
    }

    #[test]
    fn test_parse_slice_utf16() {
        let value = Value::string("name", "caf\u{e9}");
        let mut buffer = Vec::new();
        let options = VdfOptions::new().with_encoding(Encoding::Utf16Be);
        to_writer_with_options(&mut buffer, &value, &options).unwrap();
        assert_eq!(&buffer[..2], &[0xFE, 0xFF]);
        assert_eq!(parse_slice(&buffer).unwrap(), value);
    }

    #[test]
    fn test_byte_input_honours_options() {
        let bytes = b"\xEF\xBB\xBF\"n\" \"1\"";
        let options = VdfOptions::new().with_infer_numbers(false);

        assert_eq!(parse_slice(bytes).unwrap().as_i64(), Some(1));
        let value = parse_slice_with_options(bytes, &options).unwrap();
        assert_eq!(value.kind(), &Kind::String("1".to_string()));

        let value = parse_reader_with_options(&bytes[..], &options).unwrap();
        assert_eq!(value.as_str(), Some("1"));
    }
}
