//! The token loop: source text in, [`TokenizedBuffer`] out.
//!
//! The tokenizer owns the scan cursor and delegates literal recognition to
//! the two sub-lexers. Literal values are computed eagerly so their
//! diagnostics surface during lexing (rebased to absolute offsets); the
//! values themselves are recomputed on demand by whoever needs them, keeping
//! tokens to a kind plus a span.

use cocktail_diagnostic::{DiagnosticSink, RebasedSink, SyntaxDiagnosticKind};
use cocktail_lexer_core::{Cursor, SourceBuffer};

use crate::token_kind::{keyword_kind, SYMBOL_SPELLINGS};
use crate::{NumericLexeme, NumericValue, Span, StringLexeme, TokenKind};

/// An index into a [`TokenizedBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token(u32);

impl Token {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
struct TokenInfo {
    kind: TokenKind,
    span: Span,
}

/// The token stream for one source file.
///
/// Borrows the source text; token text is recovered by slicing it. The
/// buffer is immutable once lexed and always ends with an `EndOfFile` token.
#[derive(Debug)]
pub struct TokenizedBuffer<'s> {
    source: &'s str,
    tokens: Vec<TokenInfo>,
}

impl<'s> TokenizedBuffer<'s> {
    /// Lex `source` into a token buffer, reporting problems to `sink`.
    pub fn lex(source: &'s str, sink: &mut dyn DiagnosticSink) -> Self {
        let buf = SourceBuffer::new(source);
        let mut cursor = buf.cursor();
        let mut tokens = Vec::new();

        loop {
            cursor.eat_whitespace();
            if cursor.is_eof() {
                break;
            }

            let start = cursor.pos();
            match cursor.current() {
                b'\n' | b'\r' => {
                    cursor.advance();
                }
                b'/' if cursor.peek() == b'/' => {
                    cursor.eat_until_newline_or_eof();
                }
                b'0'..=b'9' => {
                    lex_numeric(source, &mut cursor, &mut tokens, sink);
                }
                b'"' | b'#' => {
                    if !lex_string(source, &mut cursor, &mut tokens, sink) {
                        lex_symbol_or_error(&mut cursor, &mut tokens, sink);
                    }
                }
                b'_' | b'a'..=b'z' | b'A'..=b'Z' => {
                    cursor.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                    let text = cursor.slice_from(start);
                    let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
                    tokens.push(TokenInfo {
                        kind,
                        span: Span::new(start, cursor.pos()),
                    });
                }
                _ => {
                    lex_symbol_or_error(&mut cursor, &mut tokens, sink);
                }
            }
        }

        tokens.push(TokenInfo {
            kind: TokenKind::EndOfFile,
            span: Span::point(cursor.source_len()),
        });

        TokenizedBuffer { source, tokens }
    }

    /// Number of tokens, including the trailing `EndOfFile`.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate all tokens in source order.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        (0..self.tokens.len() as u32).map(Token)
    }

    pub fn kind(&self, token: Token) -> TokenKind {
        self.tokens[token.index()].kind
    }

    pub fn span(&self, token: Token) -> Span {
        self.tokens[token.index()].span
    }

    /// The token's source text. Empty for `EndOfFile`.
    pub fn text(&self, token: Token) -> &'s str {
        let span = self.tokens[token.index()].span;
        &self.source[span.start as usize..span.end as usize]
    }
}

fn lex_numeric(
    source: &str,
    cursor: &mut Cursor<'_>,
    tokens: &mut Vec<TokenInfo>,
    sink: &mut dyn DiagnosticSink,
) {
    let start = cursor.pos();
    let Some(lexeme) = NumericLexeme::lex(&source[start as usize..]) else {
        debug_assert!(false, "current byte is a digit, so recognition cannot miss");
        cursor.advance();
        return;
    };

    let mut rebased = RebasedSink::new(start, sink);
    let kind = match lexeme.compute_value(&mut rebased) {
        NumericValue::Integer(_) => TokenKind::IntegerLiteral,
        NumericValue::Real { .. } => TokenKind::RealLiteral,
        NumericValue::Unrecoverable => TokenKind::Error,
    };

    let len = lexeme.text().len() as u32;
    cursor.advance_n(len);
    tokens.push(TokenInfo {
        kind,
        span: Span::new(start, start + len),
    });
}

/// Try to lex a string literal at the cursor. Returns `false` if the text
/// here is not a string at all (e.g. a bare `#`).
fn lex_string(
    source: &str,
    cursor: &mut Cursor<'_>,
    tokens: &mut Vec<TokenInfo>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let start = cursor.pos();
    let Some(lexeme) = StringLexeme::lex(&source[start as usize..]) else {
        return false;
    };

    let kind = if lexeme.is_terminated() {
        let mut rebased = RebasedSink::new(start, sink);
        let _ = lexeme.compute_value(&mut rebased);
        TokenKind::StringLiteral
    } else {
        sink.emit(start, SyntaxDiagnosticKind::UnterminatedString);
        TokenKind::Error
    };

    let len = lexeme.text().len() as u32;
    cursor.advance_n(len);
    tokens.push(TokenInfo {
        kind,
        span: Span::new(start, start + len),
    });
    true
}

fn lex_symbol_or_error(
    cursor: &mut Cursor<'_>,
    tokens: &mut Vec<TokenInfo>,
    sink: &mut dyn DiagnosticSink,
) {
    let start = cursor.pos();
    let rest = cursor.rest();

    if let Some(&(spelling, kind)) = SYMBOL_SPELLINGS
        .iter()
        .find(|&&(spelling, _)| rest.starts_with(spelling))
    {
        cursor.advance_n(spelling.len() as u32);
        tokens.push(TokenInfo {
            kind,
            span: Span::new(start, cursor.pos()),
        });
        return;
    }

    sink.emit(start, SyntaxDiagnosticKind::UnrecognizedCharacter);
    cursor.advance_char();
    tokens.push(TokenInfo {
        kind: TokenKind::Error,
        span: Span::new(start, cursor.pos()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cocktail_diagnostic::DiagnosticLog;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut log = DiagnosticLog::new();
        let buffer = TokenizedBuffer::lex(source, &mut log);
        buffer.tokens().map(|t| buffer.kind(t)).collect()
    }

    fn lex_with_log(source: &str) -> (Vec<TokenKind>, DiagnosticLog) {
        let mut log = DiagnosticLog::new();
        let buffer = TokenizedBuffer::lex(source, &mut log);
        let kinds = buffer.tokens().map(|t| buffer.kind(t)).collect();
        (kinds, log)
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfFile]);
        assert_eq!(kinds("   \t  "), vec![TokenKind::EndOfFile]);
    }

    #[test]
    fn declaration_statement() {
        assert_eq!(
            kinds("var x = 42;"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::IntegerLiteral,
                TokenKind::Semi,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn token_text_recovers_source() {
        let mut log = DiagnosticLog::new();
        let buffer = TokenizedBuffer::lex("var answer = 42;", &mut log);
        let texts: Vec<_> = buffer.tokens().map(|t| buffer.text(t)).collect();
        assert_eq!(texts, vec!["var", "answer", "=", "42", ";", ""]);
    }

    #[test]
    fn newlines_and_comments_are_trivia() {
        assert_eq!(
            kinds("a // comment\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfFile
            ]
        );
    }

    #[test]
    fn real_literals_get_their_own_kind() {
        assert_eq!(
            kinds("1.5e2 0x1.8p4"),
            vec![
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::EndOfFile
            ]
        );
    }

    #[test]
    fn invalid_number_becomes_error_token() {
        let (kinds, log) = lex_with_log("007");
        assert_eq!(kinds, vec![TokenKind::Error, TokenKind::EndOfFile]);
        assert_eq!(log.short_names(), vec!["syntax-invalid-number"]);
    }

    #[test]
    fn numeric_diagnostics_are_rebased_to_absolute_offsets() {
        let (_, log) = lex_with_log("  12__3");
        // The misplaced separator sits at lexeme offset 3, absolute offset 5.
        assert_eq!(log.diagnostics()[0].pos, 5);
    }

    #[test]
    fn string_literal_token() {
        assert_eq!(
            kinds(r#"x = "hi";"#),
            vec![
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::StringLiteral,
                TokenKind::Semi,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn raw_string_token() {
        let (kinds, log) = lex_with_log(r##"#"a\n"#"##);
        assert_eq!(kinds, vec![TokenKind::StringLiteral, TokenKind::EndOfFile]);
        assert!(log.is_empty());
    }

    #[test]
    fn multi_line_string_token_spans_lines() {
        let mut log = DiagnosticLog::new();
        let source = "\"\"\"\n  hi\n  \"\"\" x";
        let buffer = TokenizedBuffer::lex(source, &mut log);
        let toks: Vec<_> = buffer.tokens().collect();
        assert_eq!(buffer.kind(toks[0]), TokenKind::StringLiteral);
        assert_eq!(buffer.text(toks[0]), "\"\"\"\n  hi\n  \"\"\"");
        assert_eq!(buffer.kind(toks[1]), TokenKind::Identifier);
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let (kinds, log) = lex_with_log("\"abc");
        assert_eq!(kinds, vec![TokenKind::Error, TokenKind::EndOfFile]);
        assert_eq!(log.short_names(), vec!["syntax-invalid-string"]);
        assert_eq!(log.diagnostics()[0].pos, 0);
    }

    #[test]
    fn string_escape_diagnostics_are_rebased() {
        let (_, log) = lex_with_log(r#"x = "a\qb";"#);
        assert_eq!(log.short_names(), vec!["syntax-invalid-string"]);
        // `q` is at lexeme offset 3; the lexeme starts at offset 4.
        assert_eq!(log.diagnostics()[0].pos, 7);
    }

    #[test]
    fn bare_hash_is_an_error_token() {
        let (kinds, log) = lex_with_log("# x");
        assert_eq!(
            kinds,
            vec![TokenKind::Error, TokenKind::Identifier, TokenKind::EndOfFile]
        );
        assert_eq!(log.short_names(), vec!["syntax-error"]);
    }

    #[test]
    fn longest_symbol_wins() {
        assert_eq!(
            kinds("a->b <= c < -d"),
            vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::LessEqual,
                TokenKind::Identifier,
                TokenKind::Less,
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn grouping_symbols() {
        assert_eq!(
            kinds("({[]})"),
            vec![
                TokenKind::LeftParen,
                TokenKind::LeftBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::RightBrace,
                TokenKind::RightParen,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn unrecognized_character() {
        let (kinds, log) = lex_with_log("a $ b");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Error,
                TokenKind::Identifier,
                TokenKind::EndOfFile
            ]
        );
        assert_eq!(log.short_names(), vec!["syntax-error"]);
        assert_eq!(log.diagnostics()[0].pos, 2);
    }

    #[test]
    fn non_ascii_character_is_one_error_token() {
        let (kinds, log) = lex_with_log("é");
        assert_eq!(kinds, vec![TokenKind::Error, TokenKind::EndOfFile]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn eof_token_has_empty_text_at_end() {
        let mut log = DiagnosticLog::new();
        let buffer = TokenizedBuffer::lex("ab", &mut log);
        let eof = buffer.tokens().last().unwrap();
        assert_eq!(buffer.kind(eof), TokenKind::EndOfFile);
        assert_eq!(buffer.text(eof), "");
        assert_eq!(buffer.span(eof), Span::point(2));
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("if iffy while return returns true"),
            vec![
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::While,
                TokenKind::Return,
                TokenKind::Identifier,
                TokenKind::True,
                TokenKind::EndOfFile,
            ]
        );
    }
}
