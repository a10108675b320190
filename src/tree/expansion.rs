//! Per-path expansion flags for the tree view.

use std::collections::HashMap;

use super::NodePath;
use crate::model::SyntaxNode;

/// Nodes shallower than this are expanded until toggled.
pub const DEFAULT_EXPAND_DEPTH: usize = 2;

/// Expansion flags keyed by node path.
///
/// Paths never toggled fall back to the depth rule. Flags are kept for
/// hidden descendants, so collapsing and re-expanding a parent restores
/// whatever state its subtree had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    flags: HashMap<NodePath, bool>,
    expand_depth: usize,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::with_expand_depth(DEFAULT_EXPAND_DEPTH)
    }
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expand_depth(expand_depth: usize) -> Self {
        Self {
            flags: HashMap::new(),
            expand_depth,
        }
    }

    pub fn expand_depth(&self) -> usize {
        self.expand_depth
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.flags
            .get(path)
            .copied()
            .unwrap_or(path.depth() < self.expand_depth)
    }

    /// Flip the flag for `path` only and return the new value.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let expanded = !self.is_expanded(path);
        self.flags.insert(path.clone(), expanded);
        expanded
    }

    pub fn set(&mut self, path: NodePath, expanded: bool) {
        self.flags.insert(path, expanded);
    }

    /// Mark every node of `root` expanded.
    pub fn expand_all(&mut self, root: &SyntaxNode) {
        self.set_all(root, true);
    }

    /// Mark every node of `root` collapsed.
    pub fn collapse_all(&mut self, root: &SyntaxNode) {
        self.set_all(root, false);
    }

    fn set_all(&mut self, root: &SyntaxNode, expanded: bool) {
        let mut stack = vec![(root, NodePath::root())];
        while let Some((node, path)) = stack.pop() {
            for (i, child) in node.children.iter().enumerate() {
                stack.push((child, path.child(i)));
            }
            self.flags.insert(path, expanded);
        }
    }

    /// Number of paths with an explicit flag.
    pub fn explicit_count(&self) -> usize {
        self.flags.len()
    }

    /// Drop every explicit flag.
    pub fn reset(&mut self) {
        self.flags.clear();
    }
}
