//! The statement/expression grammar.
//!
//! A file is a sequence of statements: a `;`-terminated expression or a bare
//! `;`. Expressions are parsed by precedence climbing over the fixed binary
//! operator set, with prefix `-`/`!`, parenthesized groups, literals, and
//! name references.
//!
//! The parser appends node records in post-order as it goes: operands land
//! before their operator, and an interior node's `subtree_size` is fixed up
//! from the arena length when the node closes. Error recovery skips to the
//! next `;` (or EOF) and wraps everything consumed since the statement start
//! in an `InvalidParse` node flagged `has_error`, so every input produces a
//! verifiable tree.

use cocktail_diagnostic::{DiagnosticSink, SyntaxDiagnosticKind};
use cocktail_lexer::{Token, TokenKind, TokenizedBuffer};

use crate::node_kind::NodeKind;
use crate::tree::{NodeImpl, ParseTree};

/// Parse `tokens` into a tree, reporting problems to `sink`.
pub(crate) fn parse<'t>(
    tokens: &'t TokenizedBuffer<'t>,
    sink: &mut dyn DiagnosticSink,
) -> ParseTree<'t> {
    let mut parser = Parser {
        tokens,
        stream: tokens.tokens().collect(),
        position: 0,
        node_impls: Vec::new(),
        has_errors: false,
    };
    parser.parse_file(sink);

    ParseTree {
        tokens,
        node_impls: parser.node_impls,
        has_errors: parser.has_errors,
    }
}

/// Binding power of an infix operator, or `None` for non-operators.
fn infix_precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind::*;
    match kind {
        PipePipe => Some(1),
        AmpAmp => Some(2),
        EqualEqual | NotEqual => Some(3),
        Less | LessEqual | Greater | GreaterEqual => Some(4),
        Plus | Minus => Some(5),
        Star | Slash | Percent => Some(6),
        _ => None,
    }
}

struct Parser<'t> {
    tokens: &'t TokenizedBuffer<'t>,
    stream: Vec<Token>,
    position: usize,
    node_impls: Vec<NodeImpl>,
    has_errors: bool,
}

impl Parser<'_> {
    fn current_kind(&self) -> TokenKind {
        self.tokens.kind(self.stream[self.position])
    }

    fn current_token(&self) -> Token {
        self.stream[self.position]
    }

    fn current_pos(&self) -> u32 {
        self.tokens.span(self.current_token()).start
    }

    fn consume(&mut self) -> Token {
        let token = self.stream[self.position];
        debug_assert!(
            self.tokens.kind(token) != TokenKind::EndOfFile,
            "cannot consume past the end of the token stream"
        );
        self.position += 1;
        token
    }

    /// Index where the next statement's subtree will begin.
    fn mark(&self) -> usize {
        self.node_impls.len()
    }

    fn add_leaf(&mut self, kind: NodeKind, token: Token) {
        self.node_impls.push(NodeImpl {
            kind,
            token,
            subtree_size: 1,
            has_error: false,
        });
    }

    /// Close a subtree: everything appended since `start` becomes this
    /// node's children.
    fn add_node(&mut self, kind: NodeKind, token: Token, start: usize, has_error: bool) {
        let subtree_size = (self.node_impls.len() - start + 1) as u32;
        self.node_impls.push(NodeImpl {
            kind,
            token,
            subtree_size,
            has_error,
        });
        if has_error {
            self.has_errors = true;
        }
    }

    fn parse_file(&mut self, sink: &mut dyn DiagnosticSink) {
        while self.current_kind() != TokenKind::EndOfFile {
            self.parse_statement(sink);
        }
        self.add_leaf(NodeKind::FileEnd, self.current_token());
    }

    fn parse_statement(&mut self, sink: &mut dyn DiagnosticSink) {
        let start = self.mark();

        if self.current_kind() == TokenKind::Semi {
            let semi = self.consume();
            self.add_leaf(NodeKind::EmptyStatement, semi);
            return;
        }

        if self.parse_expression(sink) {
            if self.current_kind() == TokenKind::Semi {
                let semi = self.consume();
                self.add_node(NodeKind::ExpressionStatement, semi, start, false);
                return;
            }
            sink.emit(
                self.current_pos(),
                SyntaxDiagnosticKind::ExpectedStatementTerminator,
            );
        }

        self.recover_statement(start);
    }

    /// Skip to the next `;` (or EOF) and wrap everything appended since
    /// `start` in an `InvalidParse` node.
    fn recover_statement(&mut self, start: usize) {
        let error_token = self.current_token();
        while !matches!(
            self.current_kind(),
            TokenKind::Semi | TokenKind::EndOfFile
        ) {
            self.consume();
        }

        let node_token = if self.current_kind() == TokenKind::Semi {
            self.consume()
        } else {
            error_token
        };
        self.add_node(NodeKind::InvalidParse, node_token, start, true);
    }

    fn parse_expression(&mut self, sink: &mut dyn DiagnosticSink) -> bool {
        self.parse_binary(0, sink)
    }

    /// Precedence climbing; all binary operators are left-associative.
    fn parse_binary(&mut self, min_precedence: u8, sink: &mut dyn DiagnosticSink) -> bool {
        let start = self.mark();
        if !self.parse_unary(sink) {
            return false;
        }

        loop {
            let Some(precedence) = infix_precedence(self.current_kind()) else {
                return true;
            };
            if precedence < min_precedence {
                return true;
            }

            let operator = self.consume();
            if !self.parse_binary(precedence + 1, sink) {
                return false;
            }
            self.add_node(NodeKind::InfixOperator, operator, start, false);
        }
    }

    fn parse_unary(&mut self, sink: &mut dyn DiagnosticSink) -> bool {
        match self.current_kind() {
            TokenKind::Minus | TokenKind::Bang => {
                let start = self.mark();
                let operator = self.consume();
                if !self.parse_unary(sink) {
                    return false;
                }
                self.add_node(NodeKind::PrefixOperator, operator, start, false);
                true
            }
            _ => self.parse_primary(sink),
        }
    }

    fn parse_primary(&mut self, sink: &mut dyn DiagnosticSink) -> bool {
        match self.current_kind() {
            TokenKind::IntegerLiteral
            | TokenKind::RealLiteral
            | TokenKind::StringLiteral
            | TokenKind::True
            | TokenKind::False => {
                let token = self.consume();
                self.add_leaf(NodeKind::Literal, token);
                true
            }
            TokenKind::Identifier => {
                let token = self.consume();
                self.add_leaf(NodeKind::NameReference, token);
                true
            }
            TokenKind::LeftParen => {
                let start = self.mark();
                self.consume();
                if !self.parse_expression(sink) {
                    return false;
                }
                if self.current_kind() != TokenKind::RightParen {
                    sink.emit(self.current_pos(), SyntaxDiagnosticKind::UnexpectedToken);
                    return false;
                }
                let close = self.consume();
                self.add_node(NodeKind::ParenExpression, close, start, false);
                true
            }
            _ => {
                sink.emit(self.current_pos(), SyntaxDiagnosticKind::ExpectedExpression);
                false
            }
        }
    }
}
