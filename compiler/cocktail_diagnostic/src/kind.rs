//! Diagnostic kind descriptors.
//!
//! Each kind is a compile-time constant with a stable short name and a
//! message format; per-kind parameters ride along as enum payloads. A single
//! [`SyntaxDiagnosticKind`] tag avoids any per-kind dispatch machinery.

use std::fmt;

/// How severe a diagnostic is.
///
/// Warnings are always recoverable: the emitting analyzer keeps going and
/// still produces a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// Every diagnostic the front-end can emit, with its structured payload.
///
/// The short names are part of the external contract (tests match on them):
/// `syntax-invalid-number`, `syntax-irregular-digit-separators`, and
/// `syntax-invalid-string` for the literal analyzers, `syntax-error` for the
/// grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxDiagnosticKind {
    // Numeric literals
    /// A digit sequence (integer part, fraction, or exponent) contained no
    /// digits at all.
    EmptyDigitSequence,
    /// A character outside the radix's digit set.
    InvalidDigit { digit: u8, radix: u32 },
    /// `_` at the start or end of a digit sequence, or doubled.
    InvalidDigitSeparator,
    /// Separators present but not at the uniform stride for the radix.
    IrregularDigitSeparators { radix: u32 },
    /// Decimal literal with a leading zero, which reads like a base prefix.
    UnknownBaseSpecifier,
    /// `0b...` with a fractional part.
    BinaryRealLiteral,
    /// Real literal whose exponent marker does not match the radix.
    WrongRealLiteralExponent { expected: u8 },

    // String literals
    /// The closing delimiter was never found.
    UnterminatedString,
    /// Non-whitespace before the closing `"""` of a multi-line string.
    ContentBeforeStringTerminator,
    /// A content line does not begin with the closing line's indentation.
    MismatchedIndentInString,
    /// Horizontal whitespace other than plain space inside a line.
    InvalidHorizontalWhitespaceInString,
    /// Decimal digit directly after a `\0` escape.
    DecimalEscapeSequence,
    /// `\x` not followed by two uppercase hex digits.
    HexadecimalEscapeMissingDigits,
    /// `\u` not followed by braced uppercase hex digits.
    UnicodeEscapeMissingBracedDigits,
    /// `\u{...}` code point above 0x10FFFF.
    UnicodeEscapeTooLarge,
    /// `\u{...}` code point in the surrogate range.
    UnicodeEscapeSurrogate,
    /// Escape introducer followed by an unrecognized character.
    UnknownEscapeSequence { escaped: char },

    // Tokenizer
    /// A character that cannot begin any token.
    UnrecognizedCharacter,

    // Grammar
    /// A token that cannot start or continue the current production.
    UnexpectedToken,
    /// An expression was required and the next token cannot begin one.
    ExpectedExpression,
    /// A statement was not terminated by `;`.
    ExpectedStatementTerminator,
}

impl SyntaxDiagnosticKind {
    /// Stable machine name, shared by related kinds.
    pub fn short_name(self) -> &'static str {
        use SyntaxDiagnosticKind::*;
        match self {
            EmptyDigitSequence
            | InvalidDigit { .. }
            | InvalidDigitSeparator
            | UnknownBaseSpecifier
            | BinaryRealLiteral
            | WrongRealLiteralExponent { .. } => "syntax-invalid-number",
            IrregularDigitSeparators { .. } => "syntax-irregular-digit-separators",
            UnterminatedString
            | ContentBeforeStringTerminator
            | MismatchedIndentInString
            | InvalidHorizontalWhitespaceInString
            | DecimalEscapeSequence
            | HexadecimalEscapeMissingDigits
            | UnicodeEscapeMissingBracedDigits
            | UnicodeEscapeTooLarge
            | UnicodeEscapeSurrogate
            | UnknownEscapeSequence { .. } => "syntax-invalid-string",
            UnrecognizedCharacter | UnexpectedToken | ExpectedExpression
            | ExpectedStatementTerminator => "syntax-error",
        }
    }

    /// Whether this kind is a hard error or a recoverable warning.
    pub fn severity(self) -> Severity {
        use SyntaxDiagnosticKind::*;
        match self {
            IrregularDigitSeparators { .. } | DecimalEscapeSequence => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Render the human-readable message with the payload interpolated.
    pub fn message(self) -> String {
        use SyntaxDiagnosticKind::*;
        match self {
            EmptyDigitSequence => "Empty digit sequence in numeric literal.".into(),
            InvalidDigit { digit, radix } => format!(
                "Invalid digit '{}' in {} numeric literal.",
                digit as char,
                radix_name(radix)
            ),
            InvalidDigitSeparator => "Misplaced digit separator in numeric literal.".into(),
            IrregularDigitSeparators { radix } => {
                debug_assert!(radix == 10 || radix == 16, "unexpected radix");
                format!(
                    "Digit separators in {} number should appear every {} characters from the right.",
                    radix_name(radix),
                    if radix == 10 { 3 } else { 4 }
                )
            }
            UnknownBaseSpecifier => "Unknown base specifier in numeric literal.".into(),
            BinaryRealLiteral => "Binary real number literals are not supported.".into(),
            WrongRealLiteralExponent { expected } => {
                format!("Expected '{}' to introduce exponent.", expected as char)
            }
            UnterminatedString => "String is missing a terminator.".into(),
            ContentBeforeStringTerminator => {
                "Only whitespace is permitted before the closing \"\"\" of a multi-line string."
                    .into()
            }
            MismatchedIndentInString => {
                "Indentation does not match that of the closing \"\"\" in multi-line string literal."
                    .into()
            }
            InvalidHorizontalWhitespaceInString => {
                "Whitespace other than plain space must be expressed with an escape sequence in a string literal."
                    .into()
            }
            DecimalEscapeSequence => {
                "Decimal digit follows `\\0` escape sequence. Use `\\x00` instead of `\\0` if the next character is a digit."
                    .into()
            }
            HexadecimalEscapeMissingDigits => {
                "Escape sequence `\\x` must be followed by two uppercase hexadecimal digits, for example `\\x0F`."
                    .into()
            }
            UnicodeEscapeMissingBracedDigits => {
                "Escape sequence `\\u` must be followed by a braced sequence of uppercase hexadecimal digits, for example `\\u{70AD}`."
                    .into()
            }
            UnicodeEscapeTooLarge => {
                "Code point specified by `\\u{...}` escape is greater than 0x10FFFF.".into()
            }
            UnicodeEscapeSurrogate => {
                "Code point specified by `\\u{...}` escape is a surrogate character.".into()
            }
            UnknownEscapeSequence { escaped } => {
                format!("Unrecognized escape sequence `{escaped}`.")
            }
            UnrecognizedCharacter => "Unrecognized character in source file.".into(),
            UnexpectedToken => "Unexpected token.".into(),
            ExpectedExpression => "Expected expression.".into(),
            ExpectedStatementTerminator => "Expected `;` to end statement.".into(),
        }
    }
}

impl fmt::Display for SyntaxDiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.short_name(), self.message())
    }
}

fn radix_name(radix: u32) -> &'static str {
    match radix {
        2 => "binary",
        16 => "hexadecimal",
        _ => "decimal",
    }
}
