//! VDF Format Reference
//!
//! This module documents the VDF (KeyValues) text format as written and read
//! by this library.
//!
//! # Overview
//!
//! A VDF document is one named value. A value is either a scalar (string,
//! token, integer, double) or a table of further named values. Names are
//! unique within a table and children keep their order.
//!
//! # Grammar
//!
//! ```text
//! document    := value
//! value       := comment* name (" " scalar | table)
//! comment     := "//" escaped-text "\n"
//! name        := '"' escaped-text '"'
//! scalar      := string | integer | double | token
//! string      := '"' escaped-text '"'
//! integer     := '"' decimal-int-text '"'
//! double      := '"' decimal-float-text '"'
//! token       := "[$" escaped-text "]"
//! table       := "\n" indent "{" "\n" value* indent "}" "\n"
//! indent      := "  " * nesting-level
//! ```
//!
//! This is exactly what the serializer writes. The parser accepts any
//! whitespace (including `\r\n`) between tokens.
//!
//! ## Example
//!
//! ```text
//! //retry policy
//! "config"
//! {
//!   "retries" "3"
//!   "name" "hi\"there"
//!   "limits"
//!   {
//!     "cpu" "0.5"
//!   }
//!   "material" [$base_texture]
//! }
//! ```
//!
//! # Escaping
//!
//! Inside names, strings, tokens and comments, four characters are escaped:
//!
//! | Character | Written as |
//! |-----------|------------|
//! | `\` | `\\` |
//! | tab | `\t` |
//! | newline | `\n` |
//! | `"` | `\"` |
//!
//! Nothing else is altered: carriage returns, `]`, and non-ASCII text are
//! written as they are. Backslash is handled first so that no escape sequence
//! is ever escaped twice. When reading, an unknown escape such as `\q` is kept
//! as the two characters `\q`.
//!
//! # Numbers
//!
//! Integers and doubles are quoted like strings but never escaped.
//!
//! | Kind | Text | Notes |
//! |------|------|-------|
//! | Integer | `-1`, `0`, `9223372036854775807` | Plain decimal, no `+`, no leading zeros |
//! | Double | `0.1`, `-0`, `3.25` | Shortest text that reads back to the same bits, never an exponent |
//!
//! Non-finite doubles are written as `NaN`, `inf` and `-inf`; they read back
//! as strings.
//!
//! When reading, a quoted scalar becomes an integer or double only if
//! rendering that number reproduces the text exactly. `"007"`, `"+5"` and
//! `"1e5"` therefore stay strings, and re-serializing a parsed document gives
//! back the same text. A double with an integral value (`3.0` is written as
//! `"3"`) reads back as an integer of equal value.
//!
//! # Tokens
//!
//! `[$name]` marks a symbolic reference rather than literal text. The body is
//! escaped like a string. The body may contain `]`: a token ends at the last
//! unescaped `]` before the next newline or unescaped `"`, neither of which an
//! escaped body can hold. `[$a]b]` reads back as `a]b`.
//!
//! # Comments
//!
//! Every value may carry any number of `//` comment lines, written directly
//! above it at the same indentation. When reading, comments attach to the next
//! value in the same table. Comments followed by `}` or by the end of the
//! document have no value to attach to and are dropped.
//!
//! A comment runs to the end of its line. In a CRLF document the `\r` before
//! each line break belongs to the break; in an LF document it belongs to the
//! comment text. The line ending is taken from the first line that is not a
//! comment.
//!
//! # Serde Mapping
//!
//! | Rust | VDF |
//! |------|-----|
//! | `bool` | Integer `0` / `1` |
//! | Integers (up to `i64::MAX`) | Integer |
//! | `f32`, `f64` | Double |
//! | `char`, `String`, unit variants | String |
//! | `()` and unit structs | Empty string |
//! | `Option::None` | Field omitted |
//! | Structs, maps | Table |
//! | `Vec`, tuples | Table with children `"0"`, `"1"`, ... |
//! | Newtype, tuple, struct variants | Table with one child named after the variant |
//!
//! # Limitations
//!
//! - **Map keys**: Must serialize to strings or integers
//! - **Tokens**: A token followed on its own line by another `]` (for example in a
//!   trailing `// ]` comment) absorbs the text up to that bracket
//! - **Scalar kinds**: Text that looks like a canonical number reads back as a number;
//!   use [`crate::VdfOptions::with_infer_numbers`] to read everything as strings

// This module contains only documentation; no implementation code
