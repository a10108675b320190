//! The current analysis snapshot and the view state tied to it.

use crate::diagnostics::ErrorReport;
use crate::model::ResultModel;
use crate::symbols::SymbolView;
use crate::tree::{ExpansionState, NodePath, TreeView};

/// Owns one [`ResultModel`] and the tree's expansion flags.
///
/// Every view is derived from the snapshot on request. Replacing the
/// snapshot drops the expansion flags; they are never carried over to a
/// different tree.
#[derive(Debug, Clone)]
pub struct Session {
    model: ResultModel,
    expansion: ExpansionState,
}

impl Session {
    pub fn new(model: ResultModel, expand_depth: usize) -> Self {
        report_contract_violations(&model);
        Self {
            model,
            expansion: ExpansionState::with_expand_depth(expand_depth),
        }
    }

    /// Swap in the result of a new analysis run.
    pub fn replace(&mut self, model: ResultModel) {
        report_contract_violations(&model);
        self.model = model;
        self.expansion = ExpansionState::with_expand_depth(self.expansion.expand_depth());
    }

    pub fn model(&self) -> &ResultModel {
        &self.model
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn toggle(&mut self, path: &NodePath) -> bool {
        self.expansion.toggle(path)
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all(self.model.ast());
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all(self.model.ast());
    }

    pub fn tree(&self) -> TreeView<'_> {
        TreeView::new(self.model.ast())
    }

    pub fn symbols(&self) -> SymbolView<'_> {
        SymbolView::from_table(self.model.symbol_table())
    }

    pub fn errors(&self) -> ErrorReport {
        ErrorReport::from_model(&self.model)
    }
}

fn report_contract_violations(model: &ResultModel) {
    for violation in model.contract_violations() {
        log::warn!("{}", violation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeType, SyntaxAnalysis, SyntaxNode};

    fn model_with_children(n: usize) -> ResultModel {
        let children = (0..n)
            .map(|i| {
                SyntaxNode::new(NodeType::Statement, i + 1, 1)
                    .with_children(vec![SyntaxNode::new(NodeType::Expression, i + 1, 1)])
            })
            .collect();
        ResultModel::from_syntax(SyntaxAnalysis {
            ast: SyntaxNode::new(NodeType::Program, 1, 1).with_children(children),
            is_valid: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_replace_discards_expansion() {
        let mut session = Session::new(model_with_children(2), 2);
        session.toggle(&"0".parse().unwrap());
        assert_eq!(session.expansion().explicit_count(), 1);

        session.replace(model_with_children(3));
        assert_eq!(session.expansion().explicit_count(), 0);
        assert_eq!(session.expansion().expand_depth(), 2);
        assert_eq!(session.tree().visible(session.expansion()).count(), 7);
    }

    #[test]
    fn test_views_are_derived_from_snapshot() {
        let session = Session::new(model_with_children(1), 2);
        assert!(session.tree().is_available());
        assert_eq!(session.symbols(), SymbolView::NoSymbols);
        assert_eq!(session.errors(), ErrorReport::NoErrors);
    }

    #[test]
    fn test_collapse_all_hides_everything_but_root() {
        let mut session = Session::new(model_with_children(3), 2);
        session.collapse_all();
        assert_eq!(session.tree().visible(session.expansion()).count(), 1);
        session.expand_all();
        assert_eq!(session.tree().visible(session.expansion()).count(), 7);
    }
}
