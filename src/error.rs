//! Error types for the VDF value tree, serializer and parser.
//!
//! ## Error Categories
//!
//! - **Table Errors**: duplicate child names, missing names, positions out of range
//! - **Syntax Errors**: malformed VDF text, reported with line/column information
//! - **I/O Errors**: failures of the underlying sink or source, passed through unmodified
//! - **Serde Errors**: type mismatches and unsupported shapes in the serde bridge
//!
//! Serializing a tree never fails on its own. The only error a serializer can
//! report is the one its sink reports.
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{Error, Table, Value};
//!
//! let mut table = Table::new();
//! table.add(Value::integer("retries", 3)).unwrap();
//!
//! let err = table.add(Value::integer("retries", 4)).unwrap_err();
//! assert!(matches!(err, Error::DuplicateName { .. }));
//! assert_eq!(table.len(), 1);
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A table already holds a child with this name
    #[error("duplicate name: a child named \"{name}\" already exists in this table")]
    DuplicateName { name: String },

    /// A table holds no child with this name
    #[error("key not found: no child named \"{name}\" in this table")]
    KeyNotFound { name: String },

    /// Positional access outside the table's bounds
    #[error("index out of range: the index is {index} but the table holds {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// IO error from a sink or source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input bytes could not be decoded as text
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Syntax error in VDF text
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Unexpected end of input
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Type mismatch in the serde bridge
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Unsupported type for conversion into a value tree
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a duplicate name error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::duplicate_name("retries");
    /// assert!(err.to_string().contains("\"retries\""));
    /// ```
    pub fn duplicate_name(name: &str) -> Self {
        Error::DuplicateName {
            name: name.to_string(),
        }
    }

    /// Creates a key-not-found error.
    pub fn key_not_found(name: &str) -> Self {
        Error::KeyNotFound {
            name: name.to_string(),
        }
    }

    /// Creates an index-out-of-range error for a table holding `len` children.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::syntax(10, 5, "expected '\"'");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an encoding error for undecodable input.
    pub fn encoding(msg: &str) -> Self {
        Error::Encoding(msg.to_string())
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::type_mismatch("integer", "table");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the line and column for parser errors.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, col, .. } | Error::UnexpectedEof { line, col, .. } => {
                Some((*line, *col))
            }
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_messages() {
        let err = Error::index_out_of_range(4, 2);
        assert_eq!(
            err.to_string(),
            "index out of range: the index is 4 but the table holds 2 children"
        );

        let err = Error::key_not_found("missing");
        assert!(err.to_string().contains("\"missing\""));
    }

    #[test]
    fn test_io_error_passes_through() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from(io_err);
        match err {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_position() {
        assert_eq!(Error::syntax(3, 7, "bad").position(), Some((3, 7)));
        assert_eq!(Error::unexpected_eof(1, 2, "'}'").position(), Some((1, 2)));
        assert_eq!(Error::custom("x").position(), None);
    }
}
