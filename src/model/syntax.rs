//! Abstract syntax tree as delivered by the analyzer.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// Node types the analyzer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Program,
    VariableDeclaration,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    Expression,
    BinaryExpression,
    UnaryExpression,
    CallExpression,
    MemberExpression,
    LiteralExpression,
    IdentifierExpression,
    Statement,
    BlockStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    ReturnStatement,
    ExpressionStatement,
    TypeAnnotation,
    PrimitiveType,
    ArrayType,
    FunctionType,
    SyntaxError,
}

/// Coarse grouping of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Program,
    Declaration,
    Expression,
    Statement,
    Type,
    Error,
}

impl NodeType {
    pub const ALL: [NodeType; 24] = [
        NodeType::Program,
        NodeType::VariableDeclaration,
        NodeType::FunctionDeclaration,
        NodeType::ClassDeclaration,
        NodeType::InterfaceDeclaration,
        NodeType::Expression,
        NodeType::BinaryExpression,
        NodeType::UnaryExpression,
        NodeType::CallExpression,
        NodeType::MemberExpression,
        NodeType::LiteralExpression,
        NodeType::IdentifierExpression,
        NodeType::Statement,
        NodeType::BlockStatement,
        NodeType::IfStatement,
        NodeType::ForStatement,
        NodeType::WhileStatement,
        NodeType::ReturnStatement,
        NodeType::ExpressionStatement,
        NodeType::TypeAnnotation,
        NodeType::PrimitiveType,
        NodeType::ArrayType,
        NodeType::FunctionType,
        NodeType::SyntaxError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Program => "PROGRAM",
            NodeType::VariableDeclaration => "VARIABLE_DECLARATION",
            NodeType::FunctionDeclaration => "FUNCTION_DECLARATION",
            NodeType::ClassDeclaration => "CLASS_DECLARATION",
            NodeType::InterfaceDeclaration => "INTERFACE_DECLARATION",
            NodeType::Expression => "EXPRESSION",
            NodeType::BinaryExpression => "BINARY_EXPRESSION",
            NodeType::UnaryExpression => "UNARY_EXPRESSION",
            NodeType::CallExpression => "CALL_EXPRESSION",
            NodeType::MemberExpression => "MEMBER_EXPRESSION",
            NodeType::LiteralExpression => "LITERAL_EXPRESSION",
            NodeType::IdentifierExpression => "IDENTIFIER_EXPRESSION",
            NodeType::Statement => "STATEMENT",
            NodeType::BlockStatement => "BLOCK_STATEMENT",
            NodeType::IfStatement => "IF_STATEMENT",
            NodeType::ForStatement => "FOR_STATEMENT",
            NodeType::WhileStatement => "WHILE_STATEMENT",
            NodeType::ReturnStatement => "RETURN_STATEMENT",
            NodeType::ExpressionStatement => "EXPRESSION_STATEMENT",
            NodeType::TypeAnnotation => "TYPE_ANNOTATION",
            NodeType::PrimitiveType => "PRIMITIVE_TYPE",
            NodeType::ArrayType => "ARRAY_TYPE",
            NodeType::FunctionType => "FUNCTION_TYPE",
            NodeType::SyntaxError => "SYNTAX_ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NodeType::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Program => "Program",
            NodeType::VariableDeclaration => "Variable declaration",
            NodeType::FunctionDeclaration => "Function declaration",
            NodeType::ClassDeclaration => "Class declaration",
            NodeType::InterfaceDeclaration => "Interface declaration",
            NodeType::Expression => "Expression",
            NodeType::BinaryExpression => "Binary expression",
            NodeType::UnaryExpression => "Unary expression",
            NodeType::CallExpression => "Function call",
            NodeType::MemberExpression => "Member access",
            NodeType::LiteralExpression => "Literal",
            NodeType::IdentifierExpression => "Identifier",
            NodeType::Statement => "Statement",
            NodeType::BlockStatement => "Block",
            NodeType::IfStatement => "If statement",
            NodeType::ForStatement => "For loop",
            NodeType::WhileStatement => "While loop",
            NodeType::ReturnStatement => "Return",
            NodeType::ExpressionStatement => "Expression statement",
            NodeType::TypeAnnotation => "Type annotation",
            NodeType::PrimitiveType => "Primitive type",
            NodeType::ArrayType => "Array type",
            NodeType::FunctionType => "Function type",
            NodeType::SyntaxError => "Syntax error",
        }
    }

    pub fn category(&self) -> NodeCategory {
        match self {
            NodeType::Program => NodeCategory::Program,
            NodeType::SyntaxError => NodeCategory::Error,
            NodeType::VariableDeclaration
            | NodeType::FunctionDeclaration
            | NodeType::ClassDeclaration
            | NodeType::InterfaceDeclaration => NodeCategory::Declaration,
            NodeType::Expression
            | NodeType::BinaryExpression
            | NodeType::UnaryExpression
            | NodeType::CallExpression
            | NodeType::MemberExpression
            | NodeType::LiteralExpression
            | NodeType::IdentifierExpression => NodeCategory::Expression,
            NodeType::Statement
            | NodeType::BlockStatement
            | NodeType::IfStatement
            | NodeType::ForStatement
            | NodeType::WhileStatement
            | NodeType::ReturnStatement
            | NodeType::ExpressionStatement => NodeCategory::Statement,
            NodeType::TypeAnnotation
            | NodeType::PrimitiveType
            | NodeType::ArrayType
            | NodeType::FunctionType => NodeCategory::Type,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, NodeType::SyntaxError)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the syntax tree.
///
/// Each node owns its children; there are no parent links. `type_name` holds
/// the type string exactly as the analyzer sent it, so types this crate does
/// not know survive a round trip. A root with no type (missing, `null` or
/// empty) means no tree is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_type_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub position: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<SyntaxNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
}

impl SyntaxNode {
    pub fn new(node_type: NodeType, line: usize, position: usize) -> Self {
        Self {
            type_name: Some(node_type.as_str().to_string()),
            line,
            position,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The known node type, `None` when the type is missing or unrecognised.
    pub fn node_type(&self) -> Option<NodeType> {
        self.type_name.as_deref().and_then(NodeType::parse)
    }

    /// The raw type string, if present and non-empty.
    pub fn raw_type(&self) -> Option<&str> {
        self.type_name.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Whether this node can stand as the root of a displayable tree.
    pub fn is_available(&self) -> bool {
        self.raw_type().is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The value, if present and non-empty.
    pub fn display_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Attributes in key order, empty when none were sent.
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn label(&self) -> &'static str {
        self.node_type().map(|t| t.label()).unwrap_or("Unknown")
    }
}

/// Keep any string type; a non-string value counts as no type.
fn lenient_type_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_type() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::parse(t.as_str()), Some(t));
        }
        assert_eq!(NodeType::parse("LAMBDA"), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(NodeType::Program.category(), NodeCategory::Program);
        assert_eq!(NodeType::ClassDeclaration.category(), NodeCategory::Declaration);
        assert_eq!(NodeType::CallExpression.category(), NodeCategory::Expression);
        assert_eq!(NodeType::ForStatement.category(), NodeCategory::Statement);
        assert_eq!(NodeType::ArrayType.category(), NodeCategory::Type);
        assert_eq!(NodeType::SyntaxError.category(), NodeCategory::Error);
    }

    #[test]
    fn test_untyped_root_is_unavailable() {
        let node: SyntaxNode = serde_json::from_str("{}").unwrap();
        assert!(!node.is_available());
        assert!(node.children.is_empty());

        let node: SyntaxNode = serde_json::from_str(r#"{"type": null, "children": null}"#).unwrap();
        assert!(!node.is_available());

        let node: SyntaxNode = serde_json::from_str(r#"{"type": "  "}"#).unwrap();
        assert!(!node.is_available());
    }

    #[test]
    fn test_nested_node_deserializes() {
        let json = r#"{
            "type": "PROGRAM",
            "value": "",
            "line": 1,
            "position": 1,
            "children": [
                {
                    "type": "VARIABLE_DECLARATION",
                    "value": "x",
                    "line": 1,
                    "position": 1,
                    "children": [],
                    "attributes": {"kind": "let"}
                }
            ]
        }"#;
        let root: SyntaxNode = serde_json::from_str(json).unwrap();
        assert_eq!(root.node_type(), Some(NodeType::Program));
        assert_eq!(root.display_value(), None);
        assert_eq!(root.children.len(), 1);
        let decl = &root.children[0];
        assert_eq!(decl.display_value(), Some("x"));
        assert_eq!(decl.attribute_pairs().collect::<Vec<_>>(), vec![("kind", "let")]);
    }

    #[test]
    fn test_unknown_child_type_is_kept() {
        let json = r#"{"type":"PROGRAM","line":1,"position":1,
            "children":[{"type":"LAMBDA","line":2,"position":3,"children":[]}]}"#;
        let root: SyntaxNode = serde_json::from_str(json).unwrap();
        assert_eq!(root.children.len(), 1);
        let lambda = &root.children[0];
        assert_eq!(lambda.node_type(), None);
        assert_eq!(lambda.raw_type(), Some("LAMBDA"));
        assert_eq!(lambda.label(), "Unknown");
    }

    #[test]
    fn test_unknown_root_type_is_available_and_written_back() {
        let json = r#"{"type":"MODULE","line":1,"position":1,
            "children":[{"type":"PROGRAM","line":1,"position":1,"children":[]}]}"#;
        let root: SyntaxNode = serde_json::from_str(json).unwrap();
        assert!(root.is_available());
        assert_eq!(root.node_type(), None);

        let out = serde_json::to_value(&root).unwrap();
        assert_eq!(out["type"], "MODULE");
        assert_eq!(out["children"][0]["type"], "PROGRAM");
    }

    #[test]
    fn test_non_string_type_is_untyped() {
        let node: SyntaxNode = serde_json::from_str(r#"{"type": 7}"#).unwrap();
        assert_eq!(node.type_name, None);
        assert!(!node.is_available());
    }
}
