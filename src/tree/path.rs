//! Root-to-node addressing.

use thiserror::Error;

use crate::model::SyntaxNode;

/// Sequence of child indices leading from the root to a node.
///
/// The root is the empty path. Written as dot-separated indices
/// (`0.2.1`), with `.` standing for the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid node path {input:?}: {reason}")]
pub struct PathParseError {
    input: String,
    reason: String,
}

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth of the addressed node; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Follow this path from `root`, if every index exists.
    pub fn resolve<'a>(&self, root: &'a SyntaxNode) -> Option<&'a SyntaxNode> {
        self.0
            .iter()
            .try_fold(root, |node, &i| node.children.get(i))
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, ".");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl std::str::FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed.eq_ignore_ascii_case("root") {
            return Ok(NodePath::root());
        }

        trimmed
            .split('.')
            .map(|part| {
                part.parse::<usize>().map_err(|_| PathParseError {
                    input: s.to_string(),
                    reason: format!("{:?} is not a child index", part),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NodePath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    #[test]
    fn test_parse_and_display() {
        let path: NodePath = "0.2.1".parse().unwrap();
        assert_eq!(path.indices(), &[0, 2, 1]);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "0.2.1");

        assert_eq!(".".parse::<NodePath>().unwrap(), NodePath::root());
        assert_eq!("root".parse::<NodePath>().unwrap(), NodePath::root());
        assert_eq!(NodePath::root().to_string(), ".");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("0.x".parse::<NodePath>().is_err());
        assert!("1..2".parse::<NodePath>().is_err());
        assert!("-1".parse::<NodePath>().is_err());
    }

    #[test]
    fn test_resolve() {
        let root = SyntaxNode::new(NodeType::Program, 1, 1).with_children(vec![
            SyntaxNode::new(NodeType::VariableDeclaration, 1, 1),
            SyntaxNode::new(NodeType::FunctionDeclaration, 2, 1)
                .with_children(vec![SyntaxNode::new(NodeType::BlockStatement, 2, 15)]),
        ]);

        let block = NodePath::from_indices(vec![1, 0]).resolve(&root).unwrap();
        assert_eq!(block.node_type(), Some(NodeType::BlockStatement));
        assert!(NodePath::from_indices(vec![0, 0]).resolve(&root).is_none());
        assert_eq!(NodePath::root().resolve(&root), Some(&root));
    }
}
