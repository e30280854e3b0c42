//! Configuration options for VDF serialization and parsing.
//!
//! This module provides types to customize how text is produced and read:
//!
//! - [`VdfOptions`]: Main configuration struct
//! - [`Encoding`]: Text encoding used when writing to a byte sink
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{to_string_with_options, Encoding, Value, VdfOptions};
//!
//! let value = Value::string("name", "hi");
//!
//! // Four spaces per nesting level instead of two
//! let options = VdfOptions::new().with_indent(4);
//! let text = to_string_with_options(&value, &options);
//! assert_eq!(text, "\"name\" \"hi\"\n");
//!
//! // UTF-16 output for writers and files
//! let options = VdfOptions::new().with_encoding(Encoding::Utf16Le);
//! assert_eq!(options.encoding, Encoding::Utf16Le);
//! ```

use crate::{Error, Result};
use std::borrow::Cow;

/// Text encoding for byte sinks.
///
/// In-memory serialization always yields a Rust `String`; the encoding only
/// matters when writing to an [`std::io::Write`] or a file.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::Encoding;
///
/// assert_eq!(Encoding::default(), Encoding::Utf8);
/// assert_eq!(Encoding::Utf8.bom(), &[] as &[u8]);
/// assert_eq!(Encoding::Utf16Le.bom(), &[0xFF, 0xFE]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 without a byte order mark
    #[default]
    Utf8,
    /// UTF-8 preceded by the `EF BB BF` byte order mark
    Utf8Bom,
    /// UTF-16 little endian with byte order mark
    Utf16Le,
    /// UTF-16 big endian with byte order mark
    Utf16Be,
}

impl Encoding {
    /// Returns the byte order mark written before any text.
    #[must_use]
    pub const fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[],
            Encoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
        }
    }

    /// Returns a human readable label for logs and messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8 (bom)",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
        }
    }

    /// Encodes `text` and appends the bytes to `out`, without any byte order mark.
    pub fn encode_into(&self, text: &str, out: &mut Vec<u8>) {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
            Encoding::Utf16Le => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            Encoding::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
        }
    }

    /// Decodes `bytes` (without byte order mark) into text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for invalid UTF-8, an odd UTF-16 byte count,
    /// or unpaired UTF-16 surrogates.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| Error::encoding(&e.to_string())),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::encoding("odd number of bytes in UTF-16 input"));
                }
                let little_endian = *self == Encoding::Utf16Le;
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| {
                        if little_endian {
                            u16::from_le_bytes([pair[0], pair[1]])
                        } else {
                            u16::from_be_bytes([pair[0], pair[1]])
                        }
                    })
                    .collect();
                String::from_utf16(&units)
                    .map(Cow::Owned)
                    .map_err(|e| Error::encoding(&e.to_string()))
            }
        }
    }

    /// Detects the encoding from a leading byte order mark.
    ///
    /// Returns the encoding and the length of the mark. Input without a mark is UTF-8.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Encoding;
    ///
    /// assert_eq!(Encoding::detect(b"\xFF\xFE\"\0"), (Encoding::Utf16Le, 2));
    /// assert_eq!(Encoding::detect(b"\"a\""), (Encoding::Utf8, 0));
    /// ```
    #[must_use]
    pub fn detect(bytes: &[u8]) -> (Encoding, usize) {
        for encoding in [Encoding::Utf8Bom, Encoding::Utf16Le, Encoding::Utf16Be] {
            let bom = encoding.bom();
            if bytes.starts_with(bom) {
                return (encoding, bom.len());
            }
        }
        (Encoding::Utf8, 0)
    }
}

/// Configuration options for VDF serialization and parsing.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{Encoding, VdfOptions};
///
/// let options = VdfOptions::new();
/// assert_eq!(options.indent, 2);
/// assert!(options.infer_numbers);
///
/// let options = VdfOptions::new()
///     .with_indent(4)
///     .with_encoding(Encoding::Utf8Bom)
///     .with_infer_numbers(false);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VdfOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Encoding used by byte sinks.
    pub encoding: Encoding,
    /// Whether the parser turns numeric scalars into integers and doubles.
    pub infer_numbers: bool,
}

impl Default for VdfOptions {
    fn default() -> Self {
        VdfOptions {
            indent: 2,
            encoding: Encoding::default(),
            infer_numbers: true,
        }
    }
}

impl VdfOptions {
    /// Creates default options (2-space indent, UTF-8, numeric inference on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the encoding used when writing to byte sinks.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Enables or disables numeric inference in the parser.
    ///
    /// When disabled every quoted scalar parses as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{parse_str_with_options, VdfOptions};
    ///
    /// let options = VdfOptions::new().with_infer_numbers(false);
    /// let value = parse_str_with_options("\"port\" \"8080\"", &options).unwrap();
    /// assert_eq!(value.as_str(), Some("8080"));
    /// ```
    #[must_use]
    pub fn with_infer_numbers(mut self, infer_numbers: bool) -> Self {
        self.infer_numbers = infer_numbers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_utf16() {
        let mut out = Vec::new();
        Encoding::Utf16Le.encode_into("a\u{e9}", &mut out);
        assert_eq!(out, vec![0x61, 0x00, 0xE9, 0x00]);

        let mut out = Vec::new();
        Encoding::Utf16Be.encode_into("a", &mut out);
        assert_eq!(out, vec![0x00, 0x61]);
    }

    #[test]
    fn test_decode() {
        assert_eq!(Encoding::Utf8.decode(b"abc").unwrap(), "abc");
        assert_eq!(Encoding::Utf16Be.decode(&[0x00, 0x61]).unwrap(), "a");
        assert!(Encoding::Utf16Le.decode(&[0x61]).is_err());
        assert!(Encoding::Utf8.decode(&[0xFF, 0xFF]).is_err());
        // lone high surrogate
        assert!(Encoding::Utf16Le.decode(&[0x00, 0xD8]).is_err());
    }

    #[test]
    fn test_detect_bom() {
        assert_eq!(Encoding::detect(b"\xEF\xBB\xBFx"), (Encoding::Utf8Bom, 3));
        assert_eq!(Encoding::detect(b"\xFE\xFF\0x"), (Encoding::Utf16Be, 2));
        assert_eq!(Encoding::detect(b""), (Encoding::Utf8, 0));
    }
}
