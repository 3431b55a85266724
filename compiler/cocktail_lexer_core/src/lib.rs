//! Scanning substrate for the Cocktail lexer.
//!
//! This crate is the standalone bottom layer of the front-end: it has no
//! `cocktail_*` dependencies and can be reused by external tools (syntax
//! highlighters, formatters) without pulling in the compiler.
//!
//! It provides three things:
//!
//! - [`SourceBuffer`]: a sentinel-terminated copy of the source text that
//!   lets the scanner detect EOF without bounds checks.
//! - [`Cursor`]: a `Copy` byte cursor over such a buffer.
//! - [`char_class`]: the pure byte-classification predicates shared by the
//!   literal analyzers.
//!
//! # Usage
//!
//! ```
//! use cocktail_lexer_core::SourceBuffer;
//!
//! let buf = SourceBuffer::new("var x = 42;");
//! let mut cursor = buf.cursor();
//! cursor.eat_whitespace();
//! assert_eq!(cursor.current(), b'v');
//! ```

pub mod char_class;
mod cursor;
mod source_buffer;

pub use cursor::Cursor;
pub use source_buffer::SourceBuffer;
