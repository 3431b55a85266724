//! Parse node kinds.

/// The kind of a parse node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A lone `;`.
    EmptyStatement,
    /// An expression followed by `;`; the node's token is the `;`.
    ExpressionStatement,
    /// An integer, real, string, or boolean literal.
    Literal,
    /// A use of a name.
    NameReference,
    /// A unary operator applied to one operand.
    PrefixOperator,
    /// A binary operator applied to two operands.
    InfixOperator,
    /// A parenthesized expression; the node's token is the `)`.
    ParenExpression,
    /// A region that failed to parse; always flagged `has_error`.
    InvalidParse,
    /// The end-of-file marker closing the forest.
    FileEnd,
}

impl NodeKind {
    /// The kind's name, as used by the tree printer.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::Literal => "Literal",
            NodeKind::NameReference => "NameReference",
            NodeKind::PrefixOperator => "PrefixOperator",
            NodeKind::InfixOperator => "InfixOperator",
            NodeKind::ParenExpression => "ParenExpression",
            NodeKind::InvalidParse => "InvalidParse",
            NodeKind::FileEnd => "FileEnd",
        }
    }
}
