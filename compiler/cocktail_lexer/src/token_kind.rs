//! Token kinds and their fixed spellings.

/// Every kind of token the lexer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    IntegerLiteral,
    RealLiteral,
    StringLiteral,

    // Keywords
    Fn,
    Var,
    If,
    Else,
    While,
    Return,
    True,
    False,

    // Grouping symbols
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    // Other symbols
    Comma,
    Period,
    Semi,
    Colon,
    Arrow,
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,

    // Special
    Error,
    EndOfFile,
}

/// Symbol spellings, longest first so a linear scan finds the longest match.
pub(crate) const SYMBOL_SPELLINGS: &[(&str, TokenKind)] = &[
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::NotEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("&&", TokenKind::AmpAmp),
    ("||", TokenKind::PipePipe),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    (",", TokenKind::Comma),
    (".", TokenKind::Period),
    (";", TokenKind::Semi),
    (":", TokenKind::Colon),
    ("=", TokenKind::Equal),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
];

impl TokenKind {
    /// The variant's name, for debugging and dumps.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier => "Identifier",
            IntegerLiteral => "IntegerLiteral",
            RealLiteral => "RealLiteral",
            StringLiteral => "StringLiteral",
            Fn => "Fn",
            Var => "Var",
            If => "If",
            Else => "Else",
            While => "While",
            Return => "Return",
            True => "True",
            False => "False",
            LeftBrace => "LeftBrace",
            RightBrace => "RightBrace",
            LeftParen => "LeftParen",
            RightParen => "RightParen",
            LeftBracket => "LeftBracket",
            RightBracket => "RightBracket",
            Comma => "Comma",
            Period => "Period",
            Semi => "Semi",
            Colon => "Colon",
            Arrow => "Arrow",
            Equal => "Equal",
            EqualEqual => "EqualEqual",
            NotEqual => "NotEqual",
            Less => "Less",
            LessEqual => "LessEqual",
            Greater => "Greater",
            GreaterEqual => "GreaterEqual",
            Plus => "Plus",
            Minus => "Minus",
            Star => "Star",
            Slash => "Slash",
            Percent => "Percent",
            Bang => "Bang",
            Amp => "Amp",
            AmpAmp => "AmpAmp",
            Pipe => "Pipe",
            PipePipe => "PipePipe",
            Caret => "Caret",
            Error => "Error",
            EndOfFile => "EndOfFile",
        }
    }

    /// The fixed source spelling, for keywords and symbols.
    pub fn fixed_spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        if let Some(&(spelling, _)) = SYMBOL_SPELLINGS.iter().find(|&&(_, k)| k == self) {
            return Some(spelling);
        }
        match self {
            Fn => Some("fn"),
            Var => Some("var"),
            If => Some("if"),
            Else => Some("else"),
            While => Some("while"),
            Return => Some("return"),
            True => Some("true"),
            False => Some("false"),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(self, Fn | Var | If | Else | While | Return | True | False)
    }

    pub fn is_symbol(self) -> bool {
        SYMBOL_SPELLINGS.iter().any(|&(_, k)| k == self)
    }

    pub fn is_grouping_symbol(self) -> bool {
        self.is_opening_symbol() || self.is_closing_symbol()
    }

    pub fn is_opening_symbol(self) -> bool {
        use TokenKind::*;
        matches!(self, LeftBrace | LeftParen | LeftBracket)
    }

    pub fn is_closing_symbol(self) -> bool {
        use TokenKind::*;
        matches!(self, RightBrace | RightParen | RightBracket)
    }

    /// The matching opening symbol for a closing symbol.
    pub fn opening_symbol(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            RightBrace => Some(LeftBrace),
            RightParen => Some(LeftParen),
            RightBracket => Some(LeftBracket),
            _ => None,
        }
    }

    /// The matching closing symbol for an opening symbol.
    pub fn closing_symbol(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            LeftBrace => Some(RightBrace),
            LeftParen => Some(RightParen),
            LeftBracket => Some(RightBracket),
            _ => None,
        }
    }
}

/// Look up a reserved keyword by its text.
pub(crate) fn keyword_kind(text: &str) -> Option<TokenKind> {
    // Keywords are 2-6 chars; reject other lengths without comparing.
    if !(2..=6).contains(&text.len()) {
        return None;
    }
    match text {
        "fn" => Some(TokenKind::Fn),
        "var" => Some(TokenKind::Var),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "return" => Some(TokenKind::Return),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}
