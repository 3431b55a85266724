//! Numeric literal analyzer.
//!
//! A self-contained sub-lexer for binary, decimal, and hexadecimal integer
//! and real literals. Recognition ([`NumericLexeme::lex`]) extracts the
//! longest plausible lexeme without judging it; validation and value
//! computation ([`NumericLexeme::compute_value`]) happen separately so the
//! recognizer never has to backtrack.
//!
//! Values use arbitrary-precision integers: the mantissa is a `BigUint`, the
//! exponent a signed `BigInt`. Hexadecimal reals are normalized to radix 2
//! (each fractional hex digit costs four binary exponent steps), so a
//! successful real is always `mantissa * radix^exponent` with radix 2 or 10.

use cocktail_diagnostic::{DiagnosticSink, SyntaxDiagnosticKind};
use cocktail_lexer_core::char_class::{is_alnum, is_decimal_digit, is_lower, is_upper_hex_digit};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::offset_in;

/// A source span recognized as a numeric literal.
///
/// `radix_point` and `exponent` are byte offsets within `text`; when absent
/// they equal `text.len()`. Immutable once created.
#[derive(Clone, Copy, Debug)]
pub struct NumericLexeme<'a> {
    text: &'a str,
    /// Offset of the `.` within the lexeme, or `text.len()` if none.
    radix_point: usize,
    /// Offset of the exponent letter within the lexeme, or `text.len()` if none.
    exponent: usize,
}

/// The decoded value of a numeric literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumericValue {
    /// An integer literal's value.
    Integer(BigUint),
    /// A real literal's value: `mantissa * radix^exponent`.
    Real {
        /// 2 for hexadecimal source literals, 10 otherwise.
        radix: u32,
        mantissa: BigUint,
        exponent: BigInt,
    },
    /// Validation failed with a fatal diagnostic; no value exists.
    Unrecoverable,
}

impl<'a> NumericLexeme<'a> {
    /// Recognize a numeric lexeme at the start of `source_text`.
    ///
    /// Returns `None` unless the text begins with a decimal digit. The scan
    /// consumes alphanumerics and `_` freely, at most one `.` (only when
    /// followed by an alphanumeric), and at most one `+`/`-` immediately
    /// after a tentative exponent letter. Every lowercase letter after the
    /// radix point is recorded as the tentative exponent marker, so the last
    /// one seen wins; the marker's validity is judged later.
    pub fn lex(source_text: &'a str) -> Option<Self> {
        let bytes = source_text.as_bytes();
        if !bytes.first().copied().is_some_and(is_decimal_digit) {
            return None;
        }

        let mut radix_point = None;
        let mut exponent = None;
        let mut seen_plus_minus = false;

        let n = bytes.len();
        let mut i = 1;
        while i != n {
            let c = bytes[i];
            if is_alnum(c) || c == b'_' {
                if is_lower(c) && radix_point.is_some() && !seen_plus_minus {
                    exponent = Some(i);
                }
                i += 1;
                continue;
            }

            if c == b'.' && i + 1 != n && is_alnum(bytes[i + 1]) && radix_point.is_none() {
                radix_point = Some(i);
                i += 1;
                continue;
            }

            if (c == b'+' || c == b'-')
                && exponent == Some(i - 1)
                && i + 1 != n
                && is_alnum(bytes[i + 1])
            {
                debug_assert!(!seen_plus_minus, "should only consume one + or -");
                seen_plus_minus = true;
                i += 1;
                continue;
            }
            break;
        }

        Some(NumericLexeme {
            text: &source_text[..i],
            radix_point: radix_point.unwrap_or(i),
            exponent: exponent.unwrap_or(i),
        })
    }

    /// The full recognized lexeme.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Offset of the radix point, or `text().len()` when absent.
    pub fn radix_point(&self) -> usize {
        self.radix_point
    }

    /// Offset of the tentative exponent letter, or `text().len()` when absent.
    pub fn exponent(&self) -> usize {
        self.exponent
    }

    /// Validate the lexeme and compute its value.
    ///
    /// Diagnostic positions are relative to the start of the lexeme.
    pub fn compute_value(&self, sink: &mut dyn DiagnosticSink) -> NumericValue {
        let parser = Parser::new(self);

        if !parser.check(sink) {
            return NumericValue::Unrecoverable;
        }

        if parser.is_integer() {
            return NumericValue::Integer(parser.mantissa());
        }

        NumericValue::Real {
            radix: if parser.radix == 10 { 10 } else { 2 },
            mantissa: parser.mantissa(),
            exponent: parser.exponent_value(),
        }
    }
}

/// Validation and value-computation state for one lexeme.
///
/// Splits the lexeme as `[radix] int_part [. fract_part [marker [+-] exponent_part]]`.
struct Parser<'a> {
    lexeme: &'a NumericLexeme<'a>,
    /// The radix of the literal: 2, 10, or 16.
    radix: u32,
    int_part: &'a str,
    fract_part: &'a str,
    exponent_part: &'a str,
    /// True if a `-` was consumed before `exponent_part`.
    exponent_is_negative: bool,
}

impl<'a> Parser<'a> {
    fn new(lexeme: &'a NumericLexeme<'a>) -> Self {
        let text = lexeme.text;
        let mut int_part = &text[..lexeme.radix_point];
        let mut radix = 10;
        if let Some(stripped) = int_part.strip_prefix("0x") {
            radix = 16;
            int_part = stripped;
        } else if let Some(stripped) = int_part.strip_prefix("0b") {
            radix = 2;
            int_part = stripped;
        }

        let fract_part = if lexeme.radix_point < text.len() {
            &text[lexeme.radix_point + 1..lexeme.exponent]
        } else {
            ""
        };

        let mut exponent_part = if lexeme.exponent < text.len() {
            &text[lexeme.exponent + 1..]
        } else {
            ""
        };
        let mut exponent_is_negative = false;
        if let Some(stripped) = exponent_part.strip_prefix('+') {
            exponent_part = stripped;
        } else if let Some(stripped) = exponent_part.strip_prefix('-') {
            exponent_part = stripped;
            exponent_is_negative = true;
        }

        Parser {
            lexeme,
            radix,
            int_part,
            fract_part,
            exponent_part,
            exponent_is_negative,
        }
    }

    fn is_integer(&self) -> bool {
        self.lexeme.radix_point == self.lexeme.text.len()
    }

    fn check(&self, sink: &mut dyn DiagnosticSink) -> bool {
        self.check_leading_zero(sink)
            && self.check_int_part(sink)
            && self.check_fractional_part(sink)
            && self.check_exponent_part(sink)
    }

    /// A decimal literal may not begin with `0` unless it is exactly `0`;
    /// anything else reads as an unknown base specifier.
    fn check_leading_zero(&self, sink: &mut dyn DiagnosticSink) -> bool {
        if self.radix == 10 && self.int_part.starts_with('0') && self.int_part != "0" {
            sink.emit(
                self.pos_of(self.int_part),
                SyntaxDiagnosticKind::UnknownBaseSpecifier,
            );
            return false;
        }
        true
    }

    fn check_int_part(&self, sink: &mut dyn DiagnosticSink) -> bool {
        self.check_digit_sequence(self.int_part, self.radix, true, sink)
    }

    fn check_fractional_part(&self, sink: &mut dyn DiagnosticSink) -> bool {
        if self.is_integer() {
            return true;
        }

        if self.radix == 2 {
            sink.emit(
                self.lexeme.radix_point as u32,
                SyntaxDiagnosticKind::BinaryRealLiteral,
            );
            return false;
        }

        // Digit separators are not permitted in the fractional part.
        self.check_digit_sequence(self.fract_part, self.radix, false, sink)
    }

    fn check_exponent_part(&self, sink: &mut dyn DiagnosticSink) -> bool {
        if self.lexeme.exponent == self.lexeme.text.len() {
            return true;
        }

        let expected = if self.radix == 10 { b'e' } else { b'p' };
        if self.lexeme.text.as_bytes()[self.lexeme.exponent] != expected {
            sink.emit(
                self.lexeme.exponent as u32,
                SyntaxDiagnosticKind::WrongRealLiteralExponent { expected },
            );
            return false;
        }

        // The exponent body is decimal regardless of the mantissa radix.
        self.check_digit_sequence(self.exponent_part, 10, true, sink)
    }

    /// Validate one digit sequence against the radix's digit set and the
    /// separator rules. Invalid digits are fatal; misplaced or irregular
    /// separators are not.
    fn check_digit_sequence(
        &self,
        text: &str,
        radix: u32,
        allow_digit_separators: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        debug_assert!(matches!(radix, 2 | 10 | 16), "unknown radix");
        let valid_digit = |b: u8| match radix {
            2 => b == b'0' || b == b'1',
            16 => is_upper_hex_digit(b),
            _ => is_decimal_digit(b),
        };

        let offset = self.pos_of(text);
        let bytes = text.as_bytes();
        let mut num_digit_separators = 0usize;

        for (i, &c) in bytes.iter().enumerate() {
            if valid_digit(c) {
                continue;
            }

            if c == b'_' {
                if !allow_digit_separators || i == 0 || bytes[i - 1] == b'_' || i + 1 == bytes.len()
                {
                    sink.emit(
                        offset + i as u32,
                        SyntaxDiagnosticKind::InvalidDigitSeparator,
                    );
                }
                num_digit_separators += 1;
                continue;
            }

            sink.emit(
                offset + i as u32,
                SyntaxDiagnosticKind::InvalidDigit { digit: c, radix },
            );
            return false;
        }

        if num_digit_separators == bytes.len() {
            sink.emit(offset, SyntaxDiagnosticKind::EmptyDigitSequence);
            return false;
        }

        if num_digit_separators > 0 {
            self.check_digit_separator_placement(text, radix, num_digit_separators, sink);
        }

        true
    }

    /// Decimal separators must sit every 3 digits from the right, hex every
    /// 4 (strides of 4 and 5 characters counting the separator itself).
    /// Binary placement is unconstrained. At most one diagnostic per
    /// sequence.
    fn check_digit_separator_placement(
        &self,
        text: &str,
        radix: u32,
        num_digit_separators: usize,
        sink: &mut dyn DiagnosticSink,
    ) {
        debug_assert_eq!(
            text.bytes().filter(|&b| b == b'_').count(),
            num_digit_separators,
            "given wrong number of digit separators"
        );

        if radix == 2 {
            return;
        }

        let stride = if radix == 10 { 4 } else { 5 };
        let bytes = text.as_bytes();
        let mut remaining_digit_separators = num_digit_separators;
        let mut pos = bytes.len();
        while pos >= stride {
            pos -= stride;
            if bytes[pos] != b'_' {
                sink.emit(
                    self.pos_of(text),
                    SyntaxDiagnosticKind::IrregularDigitSeparators { radix },
                );
                return;
            }
            remaining_digit_separators -= 1;
        }

        if remaining_digit_separators > 0 {
            sink.emit(
                self.pos_of(text),
                SyntaxDiagnosticKind::IrregularDigitSeparators { radix },
            );
        }
    }

    /// The mantissa: integer-part digits, then (for reals) fractional-part
    /// digits, separators stripped, parsed in the source radix.
    fn mantissa(&self) -> BigUint {
        let mut digits = String::with_capacity(self.int_part.len() + self.fract_part.len());
        digits.extend(self.int_part.chars().filter(|&c| c != '_'));
        if !self.is_integer() {
            digits.extend(self.fract_part.chars().filter(|&c| c != '_'));
        }
        // Validation guarantees a nonempty, radix-valid digit string.
        BigUint::parse_bytes(digits.as_bytes(), self.radix).unwrap_or_default()
    }

    /// The effective binary or decimal exponent: the encoded exponent (with
    /// its sign) minus the fractional digit compensation.
    fn exponent_value(&self) -> BigInt {
        let mut exponent = BigInt::zero();
        if !self.exponent_part.is_empty() {
            let digits: String = self.exponent_part.chars().filter(|&c| c != '_').collect();
            let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10).unwrap_or_default();
            exponent = BigInt::from(magnitude);
            if self.exponent_is_negative {
                exponent = -exponent;
            }
        }

        let mut excess_exponent = self.fract_part.len();
        if self.radix == 16 {
            excess_exponent *= 4;
        }
        exponent - BigInt::from(excess_exponent)
    }

    /// Position of a sub-part, relative to the lexeme start.
    fn pos_of(&self, part: &str) -> u32 {
        offset_in(self.lexeme.text, part) as u32
    }
}
