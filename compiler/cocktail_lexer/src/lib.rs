//! Tokenizer and literal analyzers for the Cocktail language.
//!
//! The lexer is built from two self-contained sub-lexers plus a driving
//! token loop:
//!
//! - [`NumericLexeme`]: recognizes binary/decimal/hexadecimal integer and
//!   real literals with digit separators, and reduces them to an
//!   arbitrary-precision value.
//! - [`StringLexeme`]: recognizes simple, raw (`#`-padded), and triple-quoted
//!   multi-line string literals, and decodes them to bytes with escape
//!   expansion and indentation stripping.
//! - [`TokenizedBuffer`]: drives a cursor over the whole source, delegating
//!   to the sub-lexers and classifying everything else (identifiers,
//!   keywords, symbols, comments).
//!
//! All syntax problems go to a [`DiagnosticSink`]; the analyzers recover
//! locally and keep scanning, so one bad literal never hides the next one.
//!
//! [`DiagnosticSink`]: cocktail_diagnostic::DiagnosticSink

mod numeric_literal;
mod span;
mod string_literal;
mod token_kind;
mod tokenizer;

pub use numeric_literal::{NumericLexeme, NumericValue};
pub use span::Span;
pub use string_literal::StringLexeme;
pub use token_kind::TokenKind;
pub use tokenizer::{Token, TokenizedBuffer};

/// Byte offset of `inner` within `outer`.
///
/// # Contract
///
/// `inner` must be a subslice of `outer` (same allocation). This holds for
/// every lexeme view, which is always carved out of the analyzed text.
pub(crate) fn offset_in(outer: &str, inner: &str) -> usize {
    let offset = inner.as_ptr() as usize - outer.as_ptr() as usize;
    debug_assert!(offset + inner.len() <= outer.len(), "inner is not a subslice of outer");
    offset
}
