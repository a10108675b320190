//! Lazy pre-order walk over the expanded part of a tree.

use super::{ExpansionState, NodePath};
use crate::model::SyntaxNode;

/// One row of the materialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNode<'a> {
    pub node: &'a SyntaxNode,
    pub depth: usize,
    pub path: NodePath,
    /// Whether this is the last child of its parent. The starting node of a
    /// walk counts as last. Only used for drawing connectors.
    pub is_last_sibling: bool,
}

/// Iterator over visible nodes, in pre-order.
///
/// A node's children are only visited when its path is expanded in the
/// given state. The iterator borrows the state, so it cannot change during
/// a walk; walking again over the same state yields the same rows.
pub struct VisibleSubtree<'a, 's> {
    stack: Vec<VisibleNode<'a>>,
    state: &'s ExpansionState,
}

impl<'a, 's> VisibleSubtree<'a, 's> {
    pub(super) fn new(node: &'a SyntaxNode, path: NodePath, state: &'s ExpansionState) -> Self {
        let start = VisibleNode {
            node,
            depth: path.depth(),
            path,
            is_last_sibling: true,
        };
        Self {
            stack: vec![start],
            state,
        }
    }

    pub(super) fn empty(state: &'s ExpansionState) -> Self {
        Self {
            stack: Vec::new(),
            state,
        }
    }
}

impl<'a, 's> Iterator for VisibleSubtree<'a, 's> {
    type Item = VisibleNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        if current.node.has_children() && self.state.is_expanded(&current.path) {
            let last = current.node.children.len() - 1;
            // Reverse push so the first child is popped first
            for (i, child) in current.node.children.iter().enumerate().rev() {
                self.stack.push(VisibleNode {
                    node: child,
                    depth: current.depth + 1,
                    path: current.path.child(i),
                    is_last_sibling: i == last,
                });
            }
        }

        Some(current)
    }
}

/// Walk `node` (addressed by `path`) and its expanded descendants.
pub fn visible_subtree<'a, 's>(
    node: &'a SyntaxNode,
    path: NodePath,
    state: &'s ExpansionState,
) -> VisibleSubtree<'a, 's> {
    VisibleSubtree::new(node, path, state)
}
