//! Structural summary of a syntax tree.

use serde::Serialize;

use crate::model::{NodeType, SyntaxNode};

/// Count of nodes of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeCount {
    pub node_type: NodeType,
    pub count: usize,
}

/// Root facts plus whole-tree statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    /// Root type as sent, known or not
    pub node_type: String,
    pub value: Option<String>,
    /// Direct children of the root
    pub child_count: usize,
    pub line: usize,
    pub position: usize,
    /// Every node in the tree, root included
    pub node_count: usize,
    /// Depth of the deepest node (root = 0)
    pub max_depth: usize,
    /// Nodes per known type, in pre-order of first appearance
    pub node_type_counts: Vec<NodeTypeCount>,
    /// Whether any SYNTAX_ERROR node is present
    pub has_errors: bool,
}

impl TreeSummary {
    /// Summarize `root`; `None` when the root carries no type.
    pub fn of(root: &SyntaxNode) -> Option<Self> {
        let node_type = root.raw_type()?.to_string();

        let mut node_count = 0;
        let mut max_depth = 0;
        let mut counts: Vec<NodeTypeCount> = Vec::new();
        let mut has_errors = false;

        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            node_count += 1;
            max_depth = max_depth.max(depth);

            if let Some(t) = node.node_type() {
                has_errors |= t.is_error();
                match counts.iter_mut().find(|c| c.node_type == t) {
                    Some(c) => c.count += 1,
                    None => counts.push(NodeTypeCount {
                        node_type: t,
                        count: 1,
                    }),
                }
            }

            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        Some(Self {
            node_type,
            value: root.display_value().map(str::to_string),
            child_count: root.children.len(),
            line: root.line,
            position: root.position,
            node_count,
            max_depth,
            node_type_counts: counts,
            has_errors,
        })
    }

    pub fn count_of(&self, node_type: NodeType) -> usize {
        self.node_type_counts
            .iter()
            .find(|c| c.node_type == node_type)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
