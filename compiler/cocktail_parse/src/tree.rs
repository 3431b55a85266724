//! The post-order parse tree store: iterators, printer, verifier.

use std::fmt;

use cocktail_diagnostic::DiagnosticSink;
use cocktail_lexer::{Token, TokenizedBuffer};

use crate::grammar;
use crate::node_kind::NodeKind;

/// A lightweight handle to a node: its post-order index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node(pub(crate) u32);

impl Node {
    /// The node's post-order index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage for one node.
///
/// `subtree_size` counts the nodes of the subtree rooted here, including the
/// node itself, so the subtree occupies exactly the `subtree_size` indices
/// ending at this node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeImpl {
    pub(crate) kind: NodeKind,
    pub(crate) token: Token,
    pub(crate) subtree_size: u32,
    pub(crate) has_error: bool,
}

/// A parse tree (really a forest) stored as a post-order node array.
///
/// The tree owns its node records and borrows the token stream, which is
/// used only to recover token text. Both are immutable after construction,
/// so any number of readers may traverse concurrently.
pub struct ParseTree<'t> {
    pub(crate) tokens: &'t TokenizedBuffer<'t>,
    pub(crate) node_impls: Vec<NodeImpl>,
    pub(crate) has_errors: bool,
}

impl<'t> ParseTree<'t> {
    /// Parse `tokens` into a tree, reporting problems to `sink`.
    pub fn parse(tokens: &'t TokenizedBuffer<'t>, sink: &mut dyn DiagnosticSink) -> Self {
        grammar::parse(tokens, sink)
    }

    /// Number of nodes in the forest.
    pub fn len(&self) -> usize {
        self.node_impls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_impls.is_empty()
    }

    /// `true` if any node was parsed with errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Iterate every node in post-order (storage order).
    pub fn postorder(&self) -> PostorderIterator {
        PostorderIterator {
            next: 0,
            end: self.node_impls.len() as u32,
        }
    }

    /// Iterate the subtree rooted at `n` in post-order; `n` itself is last.
    pub fn postorder_of(&self, n: Node) -> PostorderIterator {
        let end = n.0 + 1;
        PostorderIterator {
            next: end - self.node_impls[n.index()].subtree_size,
            end,
        }
    }

    /// The immediate children of `n`, in reverse source order.
    ///
    /// Walking starts at the node just before `n` (its last child) and jumps
    /// back over each child's whole subtree — O(children), no allocation.
    pub fn children(&self, n: Node) -> SiblingIterator<'_, 't> {
        let end = i64::from(n.0) - i64::from(self.node_impls[n.index()].subtree_size);
        SiblingIterator {
            tree: self,
            current: i64::from(n.0) - 1,
            end,
        }
    }

    /// The roots of the forest, in reverse source order.
    pub fn roots(&self) -> SiblingIterator<'_, 't> {
        SiblingIterator {
            tree: self,
            current: self.node_impls.len() as i64 - 1,
            end: -1,
        }
    }

    pub fn kind(&self, n: Node) -> NodeKind {
        self.node_impls[n.index()].kind
    }

    pub fn token(&self, n: Node) -> Token {
        self.node_impls[n.index()].token
    }

    /// Source text of the node's token.
    pub fn text(&self, n: Node) -> &'t str {
        self.tokens.text(self.node_impls[n.index()].token)
    }

    pub fn has_error_in_node(&self, n: Node) -> bool {
        self.node_impls[n.index()].has_error
    }

    /// Print a human-readable nested rendering keyed by post-order indices.
    ///
    /// The output is diff-stable: identical trees print identically.
    pub fn print(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "[")?;

        let mut node_stack: Vec<(Node, u32)> = self.roots().map(|n| (n, 0)).collect();

        while let Some((n, depth)) = node_stack.pop() {
            let n_impl = &self.node_impls[n.index()];

            for _ in 0..depth {
                out.write_str("  ")?;
            }

            write!(
                out,
                "{{node_index: {}, kind: '{}', text: '{}'",
                n.0,
                n_impl.kind.name(),
                self.tokens.text(n_impl.token)
            )?;

            if n_impl.has_error {
                write!(out, ", has_error: yes")?;
            }

            if n_impl.subtree_size > 1 {
                write!(out, ", subtree_size: {}", n_impl.subtree_size)?;
                writeln!(out, ", children: [")?;
                for child in self.children(n) {
                    node_stack.push((child, depth + 1));
                }
                continue;
            }

            debug_assert_eq!(
                n_impl.subtree_size, 1,
                "Subtree size must always be a positive integer!"
            );
            out.write_str("}")?;

            // A leaf may close several enclosing subtrees at once; the depth
            // drop to the next pending node says how many.
            let next_depth = node_stack.last().map_or(0, |&(_, depth)| depth);
            debug_assert!(next_depth <= depth, "Cannot have the next depth increase!");
            for _ in 0..(depth - next_depth) {
                out.write_str("]}")?;
            }
            writeln!(out, ",")?;
        }
        writeln!(out, "]")?;
        Ok(())
    }

    /// Check every structural invariant. Violations are logged and `false`
    /// is returned; a tree produced by [`parse`](Self::parse) always
    /// verifies.
    pub fn verify(&self) -> bool {
        let mut ancestors: Vec<Node> = Vec::new();

        for index in (0..self.node_impls.len()).rev() {
            let n = Node(index as u32);
            let n_impl = &self.node_impls[index];

            if n_impl.has_error && !self.has_errors {
                tracing::error!(
                    node = index,
                    "node has errors, but the tree is not marked as having any"
                );
                return false;
            }

            if n_impl.subtree_size > 1 {
                if let Some(&parent_n) = ancestors.last() {
                    let parent_impl = &self.node_impls[parent_n.index()];
                    let end_index = index as i64 - i64::from(n_impl.subtree_size);
                    let parent_end_index =
                        parent_n.index() as i64 - i64::from(parent_impl.subtree_size);
                    if parent_end_index > end_index {
                        tracing::error!(
                            node = index,
                            subtree_size = n_impl.subtree_size,
                            parent = parent_n.index(),
                            parent_subtree_size = parent_impl.subtree_size,
                            "node's subtree extends beyond its parent's subtree"
                        );
                        return false;
                    }
                }
                // Has children, so we descend.
                ancestors.push(n);
                continue;
            }

            if n_impl.subtree_size < 1 {
                tracing::error!(
                    node = index,
                    subtree_size = n_impl.subtree_size,
                    "node has an invalid subtree size"
                );
                return false;
            }

            // A leaf closes every ancestor whose subtree ends here.
            let next_index = index as i64 - 1;
            while let Some(&parent_n) = ancestors.last() {
                let parent_impl = &self.node_impls[parent_n.index()];
                if parent_n.index() as i64 - i64::from(parent_impl.subtree_size) != next_index {
                    break;
                }
                ancestors.pop();
            }
        }

        if !ancestors.is_empty() {
            tracing::error!(
                remaining = ancestors.len(),
                "finished walking the parse tree with unclosed ancestors"
            );
            return false;
        }

        true
    }
}

/// Iterates a contiguous post-order index range.
#[derive(Clone, Copy, Debug)]
pub struct PostorderIterator {
    next: u32,
    end: u32,
}

impl Iterator for PostorderIterator {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.next == self.end {
            return None;
        }
        let n = Node(self.next);
        self.next += 1;
        Some(n)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PostorderIterator {}

/// Iterates siblings right-to-left by jumping back over whole subtrees.
///
/// Advancing subtracts the current node's `subtree_size`; the end state is
/// one position past the leftmost sibling (`-1` when walking roots).
pub struct SiblingIterator<'a, 't> {
    tree: &'a ParseTree<'t>,
    current: i64,
    end: i64,
}

impl Iterator for SiblingIterator<'_, '_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.current == self.end {
            return None;
        }
        debug_assert!(self.current > self.end, "sibling walk overshot its terminator");
        let n = Node(self.current as u32);
        self.current -= i64::from(self.tree.node_impls[n.index()].subtree_size);
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cocktail_diagnostic::DiagnosticLog;

    /// Lex a source whose tokens back the hand-built node records.
    fn buffer_with_tokens(source: &'static str) -> TokenizedBuffer<'static> {
        let mut log = DiagnosticLog::new();
        let buffer = TokenizedBuffer::lex(source, &mut log);
        assert!(log.is_empty());
        buffer
    }

    fn leaf(buffer: &TokenizedBuffer<'_>, token_index: usize) -> NodeImpl {
        NodeImpl {
            kind: NodeKind::Literal,
            token: buffer.tokens().nth(token_index).unwrap(),
            subtree_size: 1,
            has_error: false,
        }
    }

    fn interior(buffer: &TokenizedBuffer<'_>, token_index: usize, subtree_size: u32) -> NodeImpl {
        NodeImpl {
            kind: NodeKind::InfixOperator,
            token: buffer.tokens().nth(token_index).unwrap(),
            subtree_size,
            has_error: false,
        }
    }

    fn tree_of<'t>(tokens: &'t TokenizedBuffer<'t>, node_impls: Vec<NodeImpl>) -> ParseTree<'t> {
        ParseTree {
            tokens,
            node_impls,
            has_errors: false,
        }
    }

    // === Scenario: three leaves under one interior node ===

    #[test]
    fn children_walk_right_to_left() {
        let buffer = buffer_with_tokens("1 2 3 4");
        let tree = tree_of(
            &buffer,
            vec![
                leaf(&buffer, 0),
                leaf(&buffer, 1),
                leaf(&buffer, 2),
                interior(&buffer, 3, 4),
            ],
        );

        let children: Vec<_> = tree.children(Node(3)).map(|n| n.0).collect();
        assert_eq!(children, vec![2, 1, 0]);

        let roots: Vec<_> = tree.roots().map(|n| n.0).collect();
        assert_eq!(roots, vec![3]);

        assert!(tree.verify());
    }

    #[test]
    fn postorder_of_subtree_counts_subtree_size() {
        let buffer = buffer_with_tokens("1 2 3 4 5 6");
        // Forest: (0 1)->2, 3, (4)->5 as two interiors and one bare leaf.
        let tree = tree_of(
            &buffer,
            vec![
                leaf(&buffer, 0),
                leaf(&buffer, 1),
                interior(&buffer, 2, 3),
                leaf(&buffer, 3),
                leaf(&buffer, 4),
                interior(&buffer, 5, 2),
            ],
        );

        for n in tree.postorder() {
            let size = tree.node_impls[n.index()].subtree_size as usize;
            assert_eq!(tree.postorder_of(n).count(), size);
            assert_eq!(tree.postorder_of(n).last(), Some(n));
        }

        let roots: Vec<_> = tree.roots().map(|n| n.0).collect();
        assert_eq!(roots, vec![5, 3, 2]);

        assert!(tree.verify());
    }

    #[test]
    fn children_sizes_sum_to_subtree_size_minus_one() {
        let buffer = buffer_with_tokens("1 2 3 4 5");
        let tree = tree_of(
            &buffer,
            vec![
                leaf(&buffer, 0),
                leaf(&buffer, 1),
                interior(&buffer, 2, 3),
                leaf(&buffer, 3),
                interior(&buffer, 4, 5),
            ],
        );

        for n in tree.postorder() {
            let sum: u32 = tree
                .children(n)
                .map(|c| tree.node_impls[c.index()].subtree_size)
                .sum();
            assert_eq!(sum, tree.node_impls[n.index()].subtree_size - 1);
        }
        assert!(tree.verify());
    }

    #[test]
    fn empty_forest_has_no_roots() {
        let buffer = buffer_with_tokens("");
        let tree = tree_of(&buffer, Vec::new());
        assert_eq!(tree.roots().count(), 0);
        assert_eq!(tree.postorder().count(), 0);
        assert!(tree.verify());
    }

    // === Verifier rejections ===

    #[test]
    fn verify_rejects_zero_subtree_size() {
        let buffer = buffer_with_tokens("1");
        let mut bad = leaf(&buffer, 0);
        bad.subtree_size = 0;
        let tree = tree_of(&buffer, vec![bad]);
        assert!(!tree.verify());
    }

    #[test]
    fn verify_rejects_subtree_escaping_parent() {
        let buffer = buffer_with_tokens("1 2 3 4");
        // Inner claims 3 nodes but its parent only spans 2.
        let tree = tree_of(
            &buffer,
            vec![
                leaf(&buffer, 0),
                leaf(&buffer, 1),
                interior(&buffer, 2, 3),
                interior(&buffer, 3, 2),
            ],
        );
        assert!(!tree.verify());
    }

    #[test]
    fn verify_rejects_error_node_without_tree_flag() {
        let buffer = buffer_with_tokens("1");
        let mut bad = leaf(&buffer, 0);
        bad.has_error = true;
        let tree = tree_of(&buffer, vec![bad]);
        assert!(!tree.verify());

        let mut bad = leaf(&buffer, 0);
        bad.has_error = true;
        let mut tree = tree_of(&buffer, vec![bad]);
        tree.has_errors = true;
        assert!(tree.verify());
    }

    #[test]
    fn verify_rejects_oversized_root() {
        let buffer = buffer_with_tokens("1 2");
        // Root claims more nodes than exist; the sibling walk cannot close.
        let tree = tree_of(&buffer, vec![leaf(&buffer, 0), interior(&buffer, 1, 3)]);
        assert!(!tree.verify());
    }
}
