//! Parse tree and grammar for the Cocktail language.
//!
//! The parse tree is a *post-order flat arena*: nodes live in a single
//! `Vec`, in post-order traversal order, and the n-ary tree structure is
//! encoded implicitly by each node's `subtree_size`. There are no parent or
//! child pointers; children are found by arithmetic (see
//! [`ParseTree::children`]), which makes traversal allocation-free and the
//! whole tree a single contiguous allocation.
//!
//! [`ParseTree::parse`] runs the grammar over a
//! [`TokenizedBuffer`](cocktail_lexer::TokenizedBuffer) and always produces
//! a tree — parse errors surface as diagnostics plus nodes flagged
//! `has_error`, never as a missing tree.

mod grammar;
mod node_kind;
mod tree;

pub use node_kind::NodeKind;
pub use tree::{Node, ParseTree, PostorderIterator, SiblingIterator};
