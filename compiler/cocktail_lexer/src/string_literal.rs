//! String literal analyzer.
//!
//! A sub-lexer for Cocktail's three string styles:
//!
//! - simple: `"..."` on one line;
//! - raw: `#"..."#`, `##"..."##`, ... — the `#` count (the *hash level*)
//!   pads both the closing delimiter and the escape introducer, so
//!   unmodified `\` and `"` are safe inside;
//! - multi-line: `"""` (optionally followed by a file-type indicator),
//!   a newline, content lines, and a closing `"""` whose leading whitespace
//!   defines the indentation stripped from every content line.
//!
//! Recognition ([`StringLexeme::lex`]) only finds the extent of the literal
//! and whether it terminated. Decoding ([`StringLexeme::compute_value`])
//! expands escapes and strips indentation, producing raw bytes: `\xHH` can
//! encode arbitrary octets, so the decoded value is not guaranteed to be
//! UTF-8.

use cocktail_diagnostic::{DiagnosticSink, SyntaxDiagnosticKind};
use cocktail_lexer_core::char_class::{
    is_decimal_digit, is_horizontal_whitespace, is_space, is_upper_hex_digit,
};

use crate::offset_in;

/// The `"""` opening/closing marker for multi-line literals.
const MULTI_LINE_INDICATOR: &str = "\"\"\"";

/// A source span recognized as a string literal.
#[derive(Clone, Copy, Debug)]
pub struct StringLexeme<'a> {
    /// The full span, including delimiters and hash padding.
    text: &'a str,
    /// The content between the delimiters.
    content: &'a str,
    /// Number of `#`s padding the delimiters and the escape introducer.
    hash_level: usize,
    multi_line: bool,
    terminated: bool,
}

/// Size in bytes of the multi-line opening prefix, or 0 if `source_text`
/// does not begin one.
///
/// The prefix is `"""`, then any run of characters other than `#`, `"`, or
/// newline (a file-type indicator), then a newline. The newline is part of
/// the prefix and not part of the content.
fn multi_line_prefix_size(source_text: &str) -> usize {
    if !source_text.starts_with(MULTI_LINE_INDICATOR) {
        return 0;
    }

    let bytes = source_text.as_bytes();
    let start = MULTI_LINE_INDICATOR.len();
    match bytes[start..]
        .iter()
        .position(|&b| matches!(b, b'#' | b'"' | b'\n'))
    {
        Some(i) if bytes[start + i] == b'\n' => start + i + 1,
        _ => 0,
    }
}

/// `true` if `bytes[from..from + count]` exists and is all `#`.
fn has_hashes(bytes: &[u8], from: usize, count: usize) -> bool {
    from + count <= bytes.len() && bytes[from..from + count].iter().all(|&b| b == b'#')
}

impl<'a> StringLexeme<'a> {
    /// Recognize a string lexeme at the start of `source_text`.
    ///
    /// Returns `None` unless the text (after any `#`s) begins with `"` or a
    /// full multi-line prefix. An unterminated literal is returned with
    /// `is_terminated() == false` and extends to the offending newline (for
    /// simple strings) or to the end of the input.
    pub fn lex(source_text: &'a str) -> Option<Self> {
        let bytes = source_text.as_bytes();
        let n = bytes.len();

        let mut cursor = 0;
        while cursor < n && bytes[cursor] == b'#' {
            cursor += 1;
        }
        let hash_level = cursor;

        let multi_line_prefix = multi_line_prefix_size(&source_text[hash_level..]);
        let multi_line = multi_line_prefix > 0;
        if multi_line {
            cursor += multi_line_prefix;
        } else if cursor < n && bytes[cursor] == b'"' {
            cursor += 1;
        } else {
            return None;
        }

        let prefix_len = cursor;
        let escape_len = 1 + hash_level;
        let terminator_len = if multi_line { 3 + hash_level } else { 1 + hash_level };

        let unterminated = |end: usize| {
            let text = &source_text[..end];
            Some(StringLexeme {
                text,
                content: &text[prefix_len..],
                hash_level,
                multi_line,
                terminated: false,
            })
        };

        while cursor < n {
            match bytes[cursor] {
                b'\\' => {
                    if hash_level == 0 || has_hashes(bytes, cursor + 1, hash_level) {
                        cursor += escape_len;
                        // The introducer must escape something: running into
                        // the end of input (or the end of the line, for a
                        // simple string) leaves the literal unterminated.
                        if cursor >= n || (!multi_line && bytes[cursor] == b'\n') {
                            return unterminated(cursor);
                        }
                    }
                }
                b'\n' => {
                    if !multi_line {
                        return unterminated(cursor);
                    }
                }
                b'"' => {
                    let is_terminator = if multi_line {
                        source_text[cursor..].starts_with(MULTI_LINE_INDICATOR)
                            && has_hashes(bytes, cursor + 3, hash_level)
                    } else {
                        hash_level == 0 || has_hashes(bytes, cursor + 1, hash_level)
                    };
                    if is_terminator {
                        return Some(StringLexeme {
                            text: &source_text[..cursor + terminator_len],
                            content: &source_text[prefix_len..cursor],
                            hash_level,
                            multi_line,
                            terminated: true,
                        });
                    }
                }
                _ => {}
            }
            cursor += 1;
        }

        unterminated(n)
    }

    /// The full source span, including delimiters and hash padding.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The inner span between the delimiters.
    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn hash_level(&self) -> usize {
        self.hash_level
    }

    pub fn is_multi_line(&self) -> bool {
        self.multi_line
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Decode the literal: strip indentation, expand escapes.
    ///
    /// Unterminated literals decode to nothing (the owning lexer reports
    /// them). Diagnostic positions are relative to the start of the lexeme.
    pub fn compute_value(&self, sink: &mut dyn DiagnosticSink) -> Vec<u8> {
        if !self.terminated {
            return Vec::new();
        }
        let indent = if self.multi_line {
            self.check_indent(sink)
        } else {
            ""
        };
        self.expand_escapes_and_remove_indent(indent, sink)
    }

    /// The whitespace run at the start of the final line of `text`.
    fn indent_of_final_line(&self) -> &'a str {
        debug_assert!(
            self.text.contains('\n'),
            "multi-line literal text must contain a newline"
        );
        let line_start = self.text.rfind('\n').map_or(0, |i| i + 1);
        let line = &self.text[line_start..];
        let indent_len = line.bytes().take_while(|&b| is_space(b)).count();
        &line[..indent_len]
    }

    /// Compute the indent of the closing line and diagnose any
    /// non-whitespace before the closing `"""`.
    fn check_indent(&self, sink: &mut dyn DiagnosticSink) -> &'a str {
        let indent = self.indent_of_final_line();

        let indent_end = offset_in(self.text, indent) + indent.len();
        let content_end = offset_in(self.text, self.content) + self.content.len();
        if indent_end != content_end {
            sink.emit(
                indent_end as u32,
                SyntaxDiagnosticKind::ContentBeforeStringTerminator,
            );
        }

        indent
    }

    /// Walk the content line by line, consuming `indent` at each line start,
    /// copying ordinary bytes, and expanding escapes.
    fn expand_escapes_and_remove_indent(
        &self,
        indent: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<u8> {
        let content = self.content.as_bytes();
        let base = offset_in(self.text, self.content);
        let escape_len = 1 + self.hash_level;

        let mut result: Vec<u8> = Vec::with_capacity(content.len());
        let mut i = 0;

        'line: loop {
            // Re-synchronize indentation at the start of each line. A line
            // that does not carry the indent loses its leading horizontal
            // whitespace; if what follows is not a newline, the indentation
            // genuinely mismatched.
            if content[i..].starts_with(indent.as_bytes()) {
                i += indent.len();
            } else {
                let line_start = i;
                while i < content.len() && is_horizontal_whitespace(content[i]) {
                    i += 1;
                }
                if content.get(i) != Some(&b'\n') {
                    sink.emit(
                        (base + line_start) as u32,
                        SyntaxDiagnosticKind::MismatchedIndentInString,
                    );
                }
            }

            loop {
                // Copy the maximal run of ordinary bytes: everything except
                // newline, backslash, and non-space horizontal whitespace.
                let run_start = i;
                while i < content.len() {
                    let b = content[i];
                    if b == b'\n' || b == b'\\' || (is_horizontal_whitespace(b) && b != b' ') {
                        break;
                    }
                    i += 1;
                }
                result.extend_from_slice(&content[run_start..i]);

                if i == content.len() {
                    return result;
                }

                if content[i] == b'\n' {
                    // Trailing whitespace on the line just ended is dropped.
                    while let Some(&last) = result.last() {
                        if last != b'\n' && is_space(last) {
                            result.pop();
                        } else {
                            break;
                        }
                    }
                    result.push(b'\n');
                    i += 1;
                    continue 'line;
                }

                if is_horizontal_whitespace(content[i]) {
                    debug_assert!(content[i] != b' ', "should not have stopped at a plain space");
                    let ws_start = i;
                    while i < content.len() && is_horizontal_whitespace(content[i]) {
                        i += 1;
                    }
                    if content.get(i) != Some(&b'\n') {
                        // Not line-trailing: diagnose and keep the bytes.
                        sink.emit(
                            (base + ws_start) as u32,
                            SyntaxDiagnosticKind::InvalidHorizontalWhitespaceInString,
                        );
                        result.extend_from_slice(&content[ws_start..i]);
                    }
                    continue;
                }

                debug_assert_eq!(content[i], b'\\');
                if self.hash_level != 0 && !has_hashes(content, i + 1, self.hash_level) {
                    // Not an introducer at this hash level; the backslash is data.
                    result.push(b'\\');
                    i += 1;
                    continue;
                }
                i += escape_len;

                if content.get(i) == Some(&b'\n') {
                    // Escaped newline: line continuation. Nothing is emitted
                    // and trailing whitespace is preserved.
                    i += 1;
                    continue 'line;
                }

                self.expand_one_escape(content, &mut i, &mut result, base, sink);
            }
        }
    }

    /// Expand one escape sequence; `i` points just past the introducer.
    ///
    /// Recovery drops the introducer but keeps the escaped character, so a
    /// malformed escape never swallows content.
    fn expand_one_escape(
        &self,
        content: &[u8],
        i: &mut usize,
        result: &mut Vec<u8>,
        base: usize,
        sink: &mut dyn DiagnosticSink,
    ) {
        let Some(&first) = content.get(*i) else {
            debug_assert!(false, "terminated literal cannot end inside an escape");
            return;
        };
        *i += 1;

        match first {
            b't' => result.push(b'\t'),
            b'n' => result.push(b'\n'),
            b'r' => result.push(b'\r'),
            b'"' => result.push(b'"'),
            b'\'' => result.push(b'\''),
            b'\\' => result.push(b'\\'),
            b'0' => {
                result.push(0);
                if content.get(*i).copied().is_some_and(is_decimal_digit) {
                    sink.emit(
                        (base + *i) as u32,
                        SyntaxDiagnosticKind::DecimalEscapeSequence,
                    );
                }
            }
            b'x' => {
                if *i + 2 <= content.len()
                    && is_upper_hex_digit(content[*i])
                    && is_upper_hex_digit(content[*i + 1])
                {
                    result.push(hex_nibble(content[*i]) << 4 | hex_nibble(content[*i + 1]));
                    *i += 2;
                } else {
                    sink.emit(
                        (base + *i) as u32,
                        SyntaxDiagnosticKind::HexadecimalEscapeMissingDigits,
                    );
                    result.push(b'x');
                }
            }
            b'u' => {
                let mut j = *i;
                if content.get(j) == Some(&b'{') {
                    j += 1;
                    let digits_start = j;
                    while j < content.len() && is_upper_hex_digit(content[j]) {
                        j += 1;
                    }
                    if j > digits_start && content.get(j) == Some(&b'}') {
                        if expand_unicode_escape(
                            &content[digits_start..j],
                            base + digits_start,
                            result,
                            sink,
                        ) {
                            *i = j + 1;
                        } else {
                            // Invalid code point: the braced digits stay in
                            // the content as literal text.
                            result.push(b'u');
                        }
                        return;
                    }
                }
                sink.emit(
                    (base + *i) as u32,
                    SyntaxDiagnosticKind::UnicodeEscapeMissingBracedDigits,
                );
                result.push(b'u');
            }
            _ => {
                sink.emit(
                    (base + *i - 1) as u32,
                    SyntaxDiagnosticKind::UnknownEscapeSequence {
                        escaped: first as char,
                    },
                );
                result.push(first);
            }
        }
    }
}

/// Expand `\u{digits}` to UTF-8 code units, or diagnose and return `false`.
fn expand_unicode_escape(
    digits: &[u8],
    digits_pos: usize,
    result: &mut Vec<u8>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let mut code_point: u32 = 0;
    for &d in digits {
        code_point = code_point
            .saturating_mul(16)
            .saturating_add(u32::from(hex_nibble(d)));
        if code_point > 0x10FFFF {
            sink.emit(digits_pos as u32, SyntaxDiagnosticKind::UnicodeEscapeTooLarge);
            return false;
        }
    }

    if (0xD800..0xE000).contains(&code_point) {
        sink.emit(
            digits_pos as u32,
            SyntaxDiagnosticKind::UnicodeEscapeSurrogate,
        );
        return false;
    }

    // Both failure cases of `from_u32` were excluded above.
    let Some(c) = char::from_u32(code_point) else {
        return false;
    };
    let mut utf8 = [0u8; 4];
    result.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    true
}

/// Value of one uppercase hex digit.
fn hex_nibble(b: u8) -> u8 {
    debug_assert!(is_upper_hex_digit(b));
    if b <= b'9' {
        b - b'0'
    } else {
        b - b'A' + 10
    }
}
