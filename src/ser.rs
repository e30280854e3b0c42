//! VDF serialization.
//!
//! This module provides the [`Serializer`], which renders a [`Value`] tree as
//! VDF text, and the [`ValueSerializer`], which turns any `T: Serialize` into
//! a value tree.
//!
//! ## Overview
//!
//! The serializer walks the tree depth-first:
//!
//! - comment lines are written as `//text`, one per line, before their value
//! - names and string contents are quoted and escaped
//! - integers and doubles are quoted but never escaped
//! - tokens are written as `[$text]`
//! - tables open `{` and close `}` on their own lines, children indented one level deeper
//!
//! ## Sinks
//!
//! Output goes to a [`Sink`]. The same traversal drives every sink:
//!
//! - `String`: in-memory, cannot fail
//! - [`IoSink`]: any [`io::Write`], written incrementally in the chosen [`Encoding`]
//! - `fmt::Formatter`: used by `Display for Value`
//!
//! ```rust
//! use serde_vdf::{IoSink, Serializer, Encoding, Value};
//!
//! let value = Value::integer("retries", 3);
//!
//! let mut text = String::new();
//! Serializer::new(&mut text).serialize(&value).unwrap();
//! assert_eq!(text, "\"retries\" \"3\"\n");
//!
//! let mut sink = IoSink::new(Vec::new(), Encoding::Utf8);
//! Serializer::new(&mut sink).serialize(&value).unwrap();
//! assert_eq!(sink.into_inner(), text.as_bytes());
//! ```

use crate::options::{Encoding, VdfOptions};
use crate::{Error, Kind, Result, Table, Value};
use serde::{ser, Serialize};
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::io;

/// A destination for serialized text.
pub trait Sink {
    type Error;

    fn write_str(&mut self, text: &str) -> std::result::Result<(), Self::Error>;
}

impl Sink for String {
    type Error = Infallible;

    #[inline]
    fn write_str(&mut self, text: &str) -> std::result::Result<(), Infallible> {
        self.push_str(text);
        Ok(())
    }
}

impl Sink for fmt::Formatter<'_> {
    type Error = fmt::Error;

    #[inline]
    fn write_str(&mut self, text: &str) -> fmt::Result {
        fmt::Write::write_str(self, text)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    type Error = S::Error;

    #[inline]
    fn write_str(&mut self, text: &str) -> std::result::Result<(), S::Error> {
        (**self).write_str(text)
    }
}

/// A [`Sink`] over an [`io::Write`] that encodes text as it arrives.
///
/// The encoding's byte order mark is written before the first piece of text.
/// Nothing is buffered beyond one piece; wrap the writer in a
/// [`io::BufWriter`] for file output.
pub struct IoSink<W> {
    writer: W,
    encoding: Encoding,
    scratch: Vec<u8>,
    started: bool,
}

impl<W: io::Write> IoSink<W> {
    /// Wraps `writer`. The byte order mark, if the encoding has one, is
    /// written before the first text.
    pub fn new(writer: W, encoding: Encoding) -> Self {
        IoSink {
            writer,
            encoding,
            scratch: Vec::new(),
            started: false,
        }
    }

    /// Returns the encoding text is written in.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Unwraps the sink, returning the writer without flushing it.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    type Error = io::Error;

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if !self.started {
            self.started = true;
            self.writer.write_all(self.encoding.bom())?;
        }
        match self.encoding {
            Encoding::Utf8 | Encoding::Utf8Bom => self.writer.write_all(text.as_bytes()),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                self.scratch.clear();
                self.encoding.encode_into(text, &mut self.scratch);
                self.writer.write_all(&self.scratch)
            }
        }
    }
}

/// The VDF text serializer.
///
/// Holds the sink and the current indentation. Serialization itself cannot
/// fail; the only error returned is the sink's.
pub struct Serializer<S> {
    sink: S,
    indent_unit: String,
    indent: String,
}

impl<S: Sink> Serializer<S> {
    /// Creates a serializer with default options (2-space indent).
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, &VdfOptions::default())
    }

    /// Creates a serializer using the indentation width from `options`.
    ///
    /// The encoding in `options` is not consulted; it belongs to the sink.
    pub fn with_options(sink: S, options: &VdfOptions) -> Self {
        Serializer {
            sink,
            indent_unit: " ".repeat(options.indent),
            indent: String::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Writes `value` and everything below it.
    pub fn serialize(&mut self, value: &Value) -> std::result::Result<(), S::Error> {
        for line in value.comments() {
            self.write_indent()?;
            self.sink.write_str("//")?;
            self.write_escaped(line)?;
            self.sink.write_str("\n")?;
        }

        self.write_indent()?;
        self.write_quoted(value.name())?;

        match value.kind() {
            Kind::String(content) => {
                self.sink.write_str(" ")?;
                self.write_quoted(content)?;
                self.sink.write_str("\n")
            }
            Kind::Token(content) => {
                self.sink.write_str(" ")?;
                self.write_token(content)?;
                self.sink.write_str("\n")
            }
            Kind::Integer(content) => {
                self.sink.write_str(" ")?;
                self.write_unescaped(&content.to_string())?;
                self.sink.write_str("\n")
            }
            Kind::Double(content) => {
                self.sink.write_str(" ")?;
                self.write_unescaped(&content.to_string())?;
                self.sink.write_str("\n")
            }
            Kind::Table(table) => self.write_table(table),
        }
    }

    fn write_table(&mut self, table: &Table) -> std::result::Result<(), S::Error> {
        self.sink.write_str("\n")?;
        self.write_indent()?;
        self.sink.write_str("{\n")?;

        self.indent.push_str(&self.indent_unit);
        for child in table {
            self.serialize(child)?;
        }
        let depth = self.indent.len() - self.indent_unit.len();
        self.indent.truncate(depth);

        self.write_indent()?;
        self.sink.write_str("}\n")
    }

    #[inline]
    fn write_indent(&mut self) -> std::result::Result<(), S::Error> {
        if self.indent.is_empty() {
            return Ok(());
        }
        self.sink.write_str(&self.indent)
    }

    fn write_quoted(&mut self, text: &str) -> std::result::Result<(), S::Error> {
        self.sink.write_str("\"")?;
        self.write_escaped(text)?;
        self.sink.write_str("\"")
    }

    // Numeric text never contains an escapable character.
    fn write_unescaped(&mut self, text: &str) -> std::result::Result<(), S::Error> {
        self.sink.write_str("\"")?;
        self.sink.write_str(text)?;
        self.sink.write_str("\"")
    }

    fn write_token(&mut self, text: &str) -> std::result::Result<(), S::Error> {
        self.sink.write_str("[$")?;
        self.write_escaped(text)?;
        self.sink.write_str("]")
    }

    fn write_escaped(&mut self, text: &str) -> std::result::Result<(), S::Error> {
        let mut start = 0;
        for (i, byte) in text.bytes().enumerate() {
            let Some(escaped) = escape_byte(byte) else {
                continue;
            };
            if start < i {
                self.sink.write_str(&text[start..i])?;
            }
            self.sink.write_str(escaped)?;
            start = i + 1;
        }
        if start < text.len() {
            self.sink.write_str(&text[start..])?;
        }
        Ok(())
    }
}

#[inline]
fn escape_byte(byte: u8) -> Option<&'static str> {
    match byte {
        b'\\' => Some("\\\\"),
        b'\t' => Some("\\t"),
        b'\n' => Some("\\n"),
        b'"' => Some("\\\""),
        _ => None,
    }
}

/// Escapes backslash, tab, newline and double quote.
///
/// Every other character is left alone. The inverse is [`crate::unescape`].
///
/// # Examples
///
/// ```rust
/// use serde_vdf::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("a\\b\t\"c\"\n"), "a\\\\b\\t\\\"c\\\"\\n");
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| escape_byte(b).is_some()) {
        return Cow::Borrowed(text);
    }
    let mut output = String::with_capacity(text.len() + 8);
    let mut serializer = Serializer::new(&mut output);
    match serializer.write_escaped(text) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    Cow::Owned(output)
}

/// Converts any `T: Serialize` into the content of a [`Value`].
///
/// See [`crate::to_value`] for the mapping. `None` produces no content, which
/// tables use to omit the field.
pub struct ValueSerializer;

/// Collects sequence elements into a table named `"0"`, `"1"`, ...
pub struct SerializeSeq {
    table: Table,
    variant: Option<&'static str>,
}

/// Collects map entries and struct fields into a table.
pub struct SerializeTable {
    table: Table,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<Kind>;
    type Error = Error;

    type SerializeSeq = SerializeSeq;
    type SerializeTuple = SerializeSeq;
    type SerializeTupleStruct = SerializeSeq;
    type SerializeTupleVariant = SerializeSeq;
    type SerializeMap = SerializeTable;
    type SerializeStruct = SerializeTable;
    type SerializeStructVariant = SerializeTable;

    fn serialize_bool(self, v: bool) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Kind>> {
        Ok(Some(Kind::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Kind>> {
        i64::try_from(v)
            .map(|i| Some(Kind::Integer(i)))
            .map_err(|_| Error::unsupported_type("u64 values above i64::MAX"))
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Kind>> {
        Ok(Some(Kind::Double(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Kind>> {
        Ok(Some(Kind::Double(v)))
    }

    fn serialize_char(self, v: char) -> Result<Option<Kind>> {
        Ok(Some(Kind::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Option<Kind>> {
        Ok(Some(Kind::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<Kind>> {
        let mut seq = SerializeSeq::new(None);
        for byte in v {
            seq.push(Kind::Integer(*byte as i64))?;
        }
        Ok(Some(Kind::Table(seq.table)))
    }

    fn serialize_none(self) -> Result<Option<Kind>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Kind>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Kind>> {
        Ok(Some(Kind::String(String::new())))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<Kind>> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Kind>> {
        Ok(Some(Kind::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Kind>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Kind>>
    where
        T: ?Sized + Serialize,
    {
        let mut table = Table::new();
        if let Some(kind) = to_kind(value)? {
            table.add(Value::new(variant, kind))?;
        }
        Ok(Some(Kind::Table(table)))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeSeq> {
        Ok(SerializeSeq::new(None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeSeq> {
        Ok(SerializeSeq::new(None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeSeq> {
        Ok(SerializeSeq::new(None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeSeq> {
        Ok(SerializeSeq::new(Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeTable> {
        Ok(SerializeTable::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeTable> {
        Ok(SerializeTable::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTable> {
        Ok(SerializeTable::new(Some(variant)))
    }
}

/// Wraps `table` in a single-child table named after the enum variant, if any.
fn wrap_variant(table: Table, variant: Option<&'static str>) -> Result<Option<Kind>> {
    match variant {
        Some(variant) => {
            let mut outer = Table::with_capacity(1);
            outer.add(Value::table(variant, table))?;
            Ok(Some(Kind::Table(outer)))
        }
        None => Ok(Some(Kind::Table(table))),
    }
}

impl SerializeSeq {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeSeq {
            table: Table::new(),
            variant,
        }
    }

    // Absent elements keep their slot so that indices stay contiguous.
    fn push(&mut self, kind: Kind) -> Result<()> {
        let name = self.table.len().to_string();
        self.table.add(Value::new(name, kind))
    }

    fn push_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let kind = to_kind(value)?.unwrap_or_else(|| Kind::String(String::new()));
        self.push(kind)
    }
}

impl SerializeTable {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeTable {
            table: Table::new(),
            current_key: None,
            variant,
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_kind(value)? {
            Some(kind) => self.table.add(Value::new(key, kind)),
            None => Ok(()),
        }
    }
}

impl ser::SerializeSeq for SerializeSeq {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_element(value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeTuple for SerializeSeq {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_element(value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeTupleStruct for SerializeSeq {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_element(value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeTupleVariant for SerializeSeq {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_element(value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeMap for SerializeTable {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_kind(key)? {
            Some(Kind::String(s)) | Some(Kind::Token(s)) => s,
            Some(Kind::Integer(i)) => i.to_string(),
            Some(other) => {
                return Err(Error::type_mismatch("string or integer key", other.type_name()))
            }
            None => return Err(Error::custom("map keys must not be None")),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeStruct for SerializeTable {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

impl ser::SerializeStructVariant for SerializeTable {
    type Ok = Option<Kind>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Kind>> {
        wrap_variant(self.table, self.variant)
    }
}

pub(crate) fn to_kind<T: Serialize + ?Sized>(value: &T) -> Result<Option<Kind>> {
    value.serialize(ValueSerializer)
}
