//! VDF parsing and deserialization.
//!
//! This module provides the [`Parser`], which reads VDF text back into a
//! [`Value`] tree, and the [`ValueDeserializer`], which drives any
//! `T: Deserialize` from a tree.
//!
//! ## Overview
//!
//! The parser accepts everything the serializer writes, and is lenient about
//! layout:
//!
//! - **Whitespace**: spaces, tabs and line breaks between tokens are insignificant
//! - **Comments**: `//` lines attach to the next value in the same table
//! - **Escapes**: `\\`, `\t`, `\n` and `\"`; unknown escapes are kept literally
//! - **Tokens**: `[$text]` reads back as [`Kind::Token`]
//! - **Error reporting**: line/column information for every syntax error
//!
//! ## Numeric inference
//!
//! A quoted scalar becomes an integer or a double only if the number renders
//! back to exactly the same text, so re-serializing a parsed document never
//! changes it. Disable with [`VdfOptions::with_infer_numbers`].
//!
//! ```rust
//! use serde_vdf::{parse_str, Kind};
//!
//! let value = parse_str("\"config\"\n{\n  \"retries\" \"3\"\n  \"ratio\" \"0.5\"\n  \"zip\" \"007\"\n}\n").unwrap();
//! let table = value.as_table().unwrap();
//! assert_eq!(table.get("retries").unwrap().kind(), &Kind::Integer(3));
//! assert_eq!(table.get("ratio").unwrap().kind(), &Kind::Double(0.5));
//! assert_eq!(table.get("zip").unwrap().kind(), &Kind::String("007".to_string()));
//! ```

use crate::options::VdfOptions;
use crate::{Error, Kind, Result, Table, Value};
use serde::de::value::{BorrowedStrDeserializer, StrDeserializer};
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::borrow::Cow;

/// The VDF text parser.
///
/// Created via [`Parser::new`] or [`Parser::with_options`]; one parser reads
/// one document.
pub struct Parser<'de> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    infer_numbers: bool,
    crlf: bool,
}

impl<'de> Parser<'de> {
    pub fn new(input: &'de str) -> Self {
        Self::with_options(input, &VdfOptions::default())
    }

    pub fn with_options(input: &'de str, options: &VdfOptions) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            infer_numbers: options.infer_numbers,
            crlf: uses_crlf(input),
        }
    }

    /// Parses the single root value of the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] or [`Error::UnexpectedEof`] for malformed
    /// input, and [`Error::DuplicateName`] if a table repeats a name.
    pub fn parse_document(&mut self) -> Result<Value> {
        let comments = self.parse_comments()?;
        if self.at_end() {
            return Err(self.eof("a quoted name"));
        }
        let root = self.parse_entry(comments)?;

        let trailing = self.parse_comments()?;
        if !trailing.is_empty() {
            log::trace!(
                "dropping {} comment line(s) after the root value",
                trailing.len()
            );
        }
        if !self.at_end() {
            return Err(self.error("unexpected characters after the root value"));
        }
        Ok(root)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    /// Skips spaces, tabs and line breaks
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn skip_whitespace_same_line(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == ' ' || ch == '\t' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Collects the `//` lines preceding the next value.
    fn parse_comments(&mut self) -> Result<Vec<String>> {
        let mut comments = Vec::new();
        loop {
            self.skip_whitespace();
            if !self.input[self.position..].starts_with("//") {
                return Ok(comments);
            }
            self.next_char();
            self.next_char();

            let start = self.position;
            while let Some(ch) = self.peek_char() {
                if ch == '\n' {
                    break;
                }
                self.next_char();
            }
            let mut line = &self.input[start..self.position];
            if self.crlf {
                line = line.strip_suffix('\r').unwrap_or(line);
            }
            comments.push(unescape(line).into_owned());
        }
    }

    fn parse_entry(&mut self, comments: Vec<String>) -> Result<Value> {
        let name = self.parse_quoted()?;
        self.skip_whitespace_same_line();

        let kind = match self.peek_char() {
            Some('"') => {
                let text = self.parse_quoted()?;
                self.infer_scalar(text)
            }
            Some('[') => Kind::Token(self.parse_token()?),
            _ => {
                self.skip_whitespace();
                match self.peek_char() {
                    Some('{') => Kind::Table(self.parse_table()?),
                    Some('"') => {
                        let text = self.parse_quoted()?;
                        self.infer_scalar(text)
                    }
                    Some('[') => Kind::Token(self.parse_token()?),
                    Some(_) => {
                        return Err(self.error(&format!(
                            "expected a quoted value, a token or '{{' after \"{}\"",
                            name
                        )))
                    }
                    None => return Err(self.eof("a value or '{'")),
                }
            }
        };

        let mut value = Value::new(name, kind);
        *value.comments_mut() = comments;
        Ok(value)
    }

    fn parse_table(&mut self) -> Result<Table> {
        self.next_char(); // consume '{'
        let mut table = Table::new();

        loop {
            let comments = self.parse_comments()?;
            match self.peek_char() {
                Some('}') => {
                    self.next_char();
                    if !comments.is_empty() {
                        log::trace!(
                            "dropping {} comment line(s) before '}}' at line {}",
                            comments.len(),
                            self.line
                        );
                    }
                    return Ok(table);
                }
                Some('"') => {
                    let child = self.parse_entry(comments)?;
                    table.add(child)?;
                }
                Some(_) => return Err(self.error("expected a quoted name or '}'")),
                None => return Err(self.eof("'}'")),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        match self.peek_char() {
            Some('"') => {
                self.next_char();
            }
            Some(_) => return Err(self.error("expected '\"'")),
            None => return Err(self.eof("'\"'")),
        }

        let mut result = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => self.parse_escape(&mut result)?,
                other => result.push(other),
            }
        }
        Err(self.eof("closing '\"'"))
    }

    /// Reads `[$...]`. The body may itself contain `]`: it ends at the last
    /// `]` before the next raw newline, unescaped `"` or end of input, none of
    /// which an escaped body can contain.
    fn parse_token(&mut self) -> Result<String> {
        self.next_char(); // consume '['
        if self.next_char() != Some('$') {
            return Err(self.error("expected '$' after '['"));
        }

        let body_len = match token_body_len(&self.input[self.position..]) {
            Some(len) => len,
            None if self.input[self.position..].contains(['\n', '"']) => {
                return Err(self.error("expected ']' to close the token"))
            }
            None => return Err(self.eof("closing ']'")),
        };
        let end = self.position + body_len;

        let mut result = String::new();
        while self.position < end {
            match self.next_char() {
                Some('\\') => self.parse_escape(&mut result)?,
                Some(other) => result.push(other),
                None => break,
            }
        }
        self.next_char(); // consume ']'
        Ok(result)
    }

    fn parse_escape(&mut self, result: &mut String) -> Result<()> {
        match self.next_char() {
            Some(ch) => {
                push_unescaped(result, ch);
                Ok(())
            }
            None => Err(self.eof("an escape sequence")),
        }
    }

    fn infer_scalar(&self, text: String) -> Kind {
        if self.infer_numbers {
            if let Ok(i) = text.parse::<i64>() {
                if i.to_string() == text {
                    return Kind::Integer(i);
                }
            }
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() && f.to_string() == text {
                    return Kind::Double(f);
                }
            }
        }
        Kind::String(text)
    }
}

/// Byte length of a token body: up to the last unescaped `]` before a raw
/// newline, an unescaped `"` or the end of `rest`.
fn token_body_len(rest: &str) -> Option<usize> {
    let mut last_close = None;
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            ']' => last_close = Some(i),
            '\n' | '"' => break,
            _ => {}
        }
    }
    last_close
}

/// Whether the document uses CRLF line breaks.
///
/// Decided by the first line that is not a comment, since comment text may
/// itself end in a carriage return. Serialized value lines end in `"`, `]`,
/// `{` or `}`, never in `\r`.
fn uses_crlf(input: &str) -> bool {
    let mut lines = input.split_inclusive('\n').filter(|line| line.ends_with('\n'));
    let first = match lines.clone().next() {
        Some(line) => line,
        None => return false,
    };
    let decisive = lines
        .find(|line| !line.trim_start().starts_with("//"))
        .unwrap_or(first);
    decisive.ends_with("\r\n")
}

// Unknown escapes keep their backslash.
fn push_unescaped(result: &mut String, escaped: char) {
    match escaped {
        '\\' => result.push('\\'),
        't' => result.push('\t'),
        'n' => result.push('\n'),
        '"' => result.push('"'),
        other => {
            result.push('\\');
            result.push(other);
        }
    }
}

/// Reverses [`crate::escape`].
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{escape, unescape};
///
/// let text = "C:\\games\t\"quoted\"\n";
/// assert_eq!(unescape(&escape(text)), text);
/// assert_eq!(unescape("keep \\q"), "keep \\q");
/// ```
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some(escaped) => push_unescaped(&mut result, escaped),
            None => result.push('\\'),
        }
    }
    Cow::Owned(result)
}

/// Drives a `T: Deserialize` from the content of a [`Value`].
///
/// Tables deserialize as maps, or as sequences when a sequence is requested.
/// Scalars convert between text and numbers on request, since VDF does not
/// distinguish them on disk.
pub struct ValueDeserializer<'de> {
    kind: &'de Kind,
}

impl<'de> ValueDeserializer<'de> {
    pub fn new(kind: &'de Kind) -> Self {
        ValueDeserializer { kind }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.kind.type_name())
    }

    fn integer<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::Integer(i) => visitor.visit_i64(*i),
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            Kind::Double(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                visitor.visit_i64(*f as i64)
            }
            Kind::String(s) | Kind::Token(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    visitor.visit_i64(i)
                } else if let Ok(u) = s.parse::<u64>() {
                    visitor.visit_u64(u)
                } else {
                    Err(Error::type_mismatch("integer", &format!("string {:?}", s)))
                }
            }
            _ => Err(self.mismatch("integer")),
        }
    }

    fn float<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::Double(f) => visitor.visit_f64(*f),
            Kind::Integer(i) => visitor.visit_f64(*i as f64),
            Kind::String(s) | Kind::Token(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::type_mismatch("double", &format!("string {:?}", s)))
                .and_then(|f| visitor.visit_f64(f)),
            Kind::Table(_) => Err(self.mismatch("double")),
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::String(s) | Kind::Token(s) => visitor.visit_borrowed_str(s),
            Kind::Integer(i) => visitor.visit_i64(*i),
            Kind::Double(f) => visitor.visit_f64(*f),
            Kind::Table(table) => visitor.visit_map(TableAccess::new(table)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::Integer(0) => visitor.visit_bool(false),
            Kind::Integer(1) => visitor.visit_bool(true),
            Kind::String(s) | Kind::Token(s) => match s.trim() {
                "0" | "false" => visitor.visit_bool(false),
                "1" | "true" => visitor.visit_bool(true),
                other => Err(Error::type_mismatch("bool", &format!("string {:?}", other))),
            },
            _ => Err(self.mismatch("bool")),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::String(s) | Kind::Token(s) => visitor.visit_borrowed_str(s),
            // inference turned the text into a number; it renders back identically
            Kind::Integer(i) => visitor.visit_string(i.to_string()),
            Kind::Double(f) => visitor.visit_string(f.to_string()),
            Kind::Table(_) => Err(self.mismatch("string")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::Table(table) => visitor.visit_seq(TableAccess::new(table)),
            _ => Err(self.mismatch("table")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.kind {
            Kind::Table(table) => visitor.visit_map(TableAccess::new(table)),
            _ => Err(self.mismatch("table")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.kind {
            Kind::String(s) | Kind::Token(s) => {
                let variant: StrDeserializer<'_, Error> = s.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            Kind::Table(table) if table.len() == 1 => match table.iter().next() {
                Some(child) => visitor.visit_enum(VariantAccess { child }),
                None => Err(self.mismatch("enum")),
            },
            _ => Err(self.mismatch("enum variant name or single-entry table")),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf
    }
}

/// Walks a table's children as map entries or sequence elements.
struct TableAccess<'de> {
    children: indexmap::map::Values<'de, String, Value>,
    pending: Option<&'de Kind>,
}

impl<'de> TableAccess<'de> {
    fn new(table: &'de Table) -> Self {
        TableAccess {
            children: table.iter(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for TableAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.children.next() {
            Some(child) => {
                self.pending = Some(child.kind());
                let key: BorrowedStrDeserializer<'de, Error> =
                    BorrowedStrDeserializer::new(child.name());
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let kind = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        seed.deserialize(ValueDeserializer::new(kind))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.children.len())
    }
}

impl<'de> de::SeqAccess<'de> for TableAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.children.next() {
            Some(child) => seed.deserialize(ValueDeserializer::new(child.kind())).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.children.len())
    }
}

/// A single-child table read as an enum: the child's name picks the variant.
struct VariantAccess<'de> {
    child: &'de Value,
}

impl<'de> de::EnumAccess<'de> for VariantAccess<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: DeserializeSeed<'de>,
    {
        let name: BorrowedStrDeserializer<'de, Error> =
            BorrowedStrDeserializer::new(self.child.name());
        let variant = seed.deserialize(name)?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.child.kind()))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(ValueDeserializer::new(self.child.kind()), visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(ValueDeserializer::new(self.child.kind()), visitor)
    }
}
