//! Expandable view over the syntax tree.
//!
//! The tree itself is never touched. Expansion lives in an
//! [`ExpansionState`] owned by whoever displays the tree and is passed in
//! for each walk.

mod expansion;
mod path;
mod summary;
mod visible;

pub use expansion::{ExpansionState, DEFAULT_EXPAND_DEPTH};
pub use path::{NodePath, PathParseError};
pub use summary::{NodeTypeCount, TreeSummary};
pub use visible::{visible_subtree, VisibleNode, VisibleSubtree};

use crate::model::SyntaxNode;

/// Materialized view of an AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeView<'a> {
    /// The root has no type: nothing to show.
    Unavailable,
    Available(&'a SyntaxNode),
}

impl<'a> TreeView<'a> {
    pub fn new(ast: &'a SyntaxNode) -> Self {
        if ast.is_available() {
            TreeView::Available(ast)
        } else {
            TreeView::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TreeView::Available(_))
    }

    pub fn root(&self) -> Option<&'a SyntaxNode> {
        match self {
            TreeView::Available(root) => Some(root),
            TreeView::Unavailable => None,
        }
    }

    /// Visible rows from the root under `state`; empty when unavailable.
    pub fn visible<'s>(&self, state: &'s ExpansionState) -> VisibleSubtree<'a, 's> {
        match self {
            TreeView::Available(root) => visible_subtree(root, NodePath::root(), state),
            TreeView::Unavailable => VisibleSubtree::empty(state),
        }
    }

    pub fn summary(&self) -> Option<TreeSummary> {
        self.root().and_then(TreeSummary::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    /// PROGRAM
    /// ├─ VARIABLE_DECLARATION x
    /// │  └─ LITERAL_EXPRESSION 1
    /// └─ FUNCTION_DECLARATION f
    ///    ├─ PARAMS (TYPE_ANNOTATION)
    ///    └─ BLOCK_STATEMENT
    ///       └─ RETURN_STATEMENT
    ///          └─ IDENTIFIER_EXPRESSION x
    fn sample_tree() -> SyntaxNode {
        SyntaxNode::new(NodeType::Program, 1, 1).with_children(vec![
            SyntaxNode::new(NodeType::VariableDeclaration, 1, 1)
                .with_value("x")
                .with_children(vec![
                    SyntaxNode::new(NodeType::LiteralExpression, 1, 9).with_value("1")
                ]),
            SyntaxNode::new(NodeType::FunctionDeclaration, 2, 1)
                .with_value("f")
                .with_children(vec![
                    SyntaxNode::new(NodeType::TypeAnnotation, 2, 12),
                    SyntaxNode::new(NodeType::BlockStatement, 2, 20).with_children(vec![
                        SyntaxNode::new(NodeType::ReturnStatement, 3, 5).with_children(vec![
                            SyntaxNode::new(NodeType::IdentifierExpression, 3, 12)
                                .with_value("x"),
                        ]),
                    ]),
                ]),
        ])
    }

    fn paths(view: TreeView<'_>, state: &ExpansionState) -> Vec<String> {
        view.visible(state).map(|v| v.path.to_string()).collect()
    }

    #[test]
    fn test_default_state_shows_two_levels() {
        let tree = sample_tree();
        let view = TreeView::new(&tree);
        let state = ExpansionState::new();

        // Root and depth-1 nodes are expanded, so depth-2 nodes show but
        // their children do not.
        assert_eq!(paths(view, &state), vec![".", "0", "0.0", "1", "1.0", "1.1"]);
    }

    #[test]
    fn test_expand_all_visits_every_node_once_in_pre_order() {
        let tree = sample_tree();
        let view = TreeView::new(&tree);
        let mut state = ExpansionState::new();
        state.expand_all(&tree);

        let rows: Vec<_> = view.visible(&state).collect();
        assert_eq!(rows.len(), 8);
        let order: Vec<_> = rows.iter().map(|r| r.path.to_string()).collect();
        assert_eq!(
            order,
            vec![".", "0", "0.0", "1", "1.0", "1.1", "1.1.0", "1.1.0.0"]
        );
        let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 2, 2, 3, 4]);
        for row in &rows {
            assert_eq!(row.depth, row.path.depth());
            assert_eq!(row.path.resolve(&tree), Some(row.node));
        }
    }

    #[test]
    fn test_last_sibling_flags() {
        let tree = sample_tree();
        let state = ExpansionState::new();
        let flags: Vec<_> = TreeView::new(&tree)
            .visible(&state)
            .map(|v| v.is_last_sibling)
            .collect();
        assert_eq!(flags, vec![true, false, true, true, false, true]);
    }

    #[test]
    fn test_double_toggle_restores_visible_set() {
        let tree = sample_tree();
        let view = TreeView::new(&tree);
        let mut state = ExpansionState::new();
        let before = paths(view, &state);

        let target: NodePath = "1".parse().unwrap();
        state.toggle(&target);
        assert_eq!(paths(view, &state), vec![".", "0", "0.0", "1"]);
        state.toggle(&target);
        assert_eq!(paths(view, &state), before);
    }

    #[test]
    fn test_collapsed_parent_remembers_child_state() {
        let tree = sample_tree();
        let view = TreeView::new(&tree);
        let mut state = ExpansionState::new();

        state.toggle(&"1.1".parse().unwrap());
        let expanded = paths(view, &state);
        assert!(expanded.contains(&"1.1.0".to_string()));

        state.toggle(&"1".parse().unwrap());
        assert!(!paths(view, &state).contains(&"1.1".to_string()));

        state.toggle(&"1".parse().unwrap());
        assert_eq!(paths(view, &state), expanded);
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = sample_tree();
        let view = TreeView::new(&tree);
        let state = ExpansionState::new();
        let first: Vec<_> = view.visible(&state).collect();
        let second: Vec<_> = view.visible(&state).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_subtree_walk_from_inner_node() {
        let tree = sample_tree();
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        let start: NodePath = "1.1".parse().unwrap();
        let node = start.resolve(&tree).unwrap();

        let rows: Vec<_> = visible_subtree(node, start, &state).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].depth, 2);
        assert_eq!(rows[2].path.to_string(), "1.1.0.0");
    }

    #[test]
    fn test_untyped_root_yields_nothing() {
        let tree = SyntaxNode::default();
        let view = TreeView::new(&tree);
        let state = ExpansionState::new();
        assert_eq!(view, TreeView::Unavailable);
        assert_eq!(view.visible(&state).count(), 0);
        assert!(view.summary().is_none());
    }

    #[test]
    fn test_unknown_root_type_still_renders() {
        let tree: SyntaxNode = serde_json::from_str(
            r#"{"type":"MODULE","line":1,"position":1,"children":[
                {"type":"VARIABLE_DECLARATION","line":1,"position":1,"children":[]},
                {"type":"RETURN_STATEMENT","line":2,"position":1,"children":[]}
            ]}"#,
        )
        .unwrap();
        let view = TreeView::new(&tree);
        assert!(view.is_available());

        let paths: Vec<String> = view
            .visible(&ExpansionState::new())
            .map(|v| v.path.to_string())
            .collect();
        assert_eq!(paths, vec![".", "0", "1"]);

        let summary = view.summary().unwrap();
        assert_eq!(summary.node_type, "MODULE");
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.count_of(NodeType::ReturnStatement), 1);
    }

    #[test]
    fn test_syntax_error_node_keeps_child_order() {
        let tree = SyntaxNode::new(NodeType::Program, 1, 1).with_children(vec![
            SyntaxNode::new(NodeType::SyntaxError, 4, 2).with_children(vec![
                SyntaxNode::new(NodeType::IdentifierExpression, 4, 2).with_value("a"),
                SyntaxNode::new(NodeType::IdentifierExpression, 4, 4).with_value("b"),
            ]),
        ]);
        let state = ExpansionState::new();
        let values: Vec<_> = TreeView::new(&tree)
            .visible(&state)
            .filter_map(|v| v.node.display_value())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_summary() {
        let tree = sample_tree();
        let summary = TreeView::new(&tree).summary().unwrap();
        assert_eq!(summary.node_type, "PROGRAM");
        assert_eq!(summary.child_count, 2);
        assert_eq!(summary.node_count, 8);
        assert_eq!(summary.max_depth, 4);
        assert_eq!(summary.count_of(NodeType::IdentifierExpression), 1);
        assert_eq!(summary.count_of(NodeType::WhileStatement), 0);
        assert_eq!(summary.node_type_counts[0].node_type, NodeType::Program);
        assert!(!summary.has_errors);
    }
}
