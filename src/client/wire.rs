//! Request and response bodies of the narrower analyzer endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{null_as_default, SemanticError, Symbol, SyntaxError, SyntaxNode};

/// Body of every analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest<'a> {
    pub code: &'a str,
}

/// Construct kinds the analyzer can validate in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    ForLoop,
    Function,
    VariableDeclaration,
}

impl StructureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::ForLoop => "for_loop",
            StructureType::Function => "function",
            StructureType::VariableDeclaration => "variable_declaration",
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for_loop" => Ok(StructureType::ForLoop),
            "function" => Ok(StructureType::Function),
            "variable_declaration" => Ok(StructureType::VariableDeclaration),
            _ => Err(format!(
                "unknown structure {:?}, must be 'for_loop', 'function' or 'variable_declaration'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureValidationRequest<'a> {
    pub code: &'a str,
    pub structure_type: StructureType,
}

/// Result of validating one construct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureValidation {
    #[serde(default)]
    pub structure_type: String,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub structure_errors: Vec<SyntaxError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub general_errors: Vec<SyntaxError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ast: SyntaxNode,
}

/// Response of the AST-only endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ast: SyntaxNode,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub summary: Option<RemoteAstSummary>,
}

/// Summary the analyzer computes alongside the AST.
///
/// Only logged for comparison; the view computes its own summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAstSummary {
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub node_value: String,
    #[serde(default)]
    pub child_count: usize,
    #[serde(default)]
    pub has_errors: bool,
    #[serde(default)]
    pub node_type_counts: BTreeMap<String, usize>,
    #[serde(default)]
    pub depth: usize,
}

/// Response of the symbol-table-only endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTableResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol_table: Vec<Symbol>,
    #[serde(default)]
    pub symbol_count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub semantic_errors: Vec<SemanticError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_request_wire_format() {
        let body = StructureValidationRequest {
            code: "for (;;) {}",
            structure_type: StructureType::ForLoop,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"code":"for (;;) {}","structureType":"for_loop"}"#
        );
    }

    #[test]
    fn test_ast_response_with_summary() {
        let json = r#"{
            "ast": {"type": "PROGRAM", "line": 1, "position": 1, "children": []},
            "isValid": true,
            "summary": {
                "nodeType": "PROGRAM",
                "nodeValue": "",
                "childCount": 0,
                "hasErrors": false,
                "nodeTypeCounts": {"PROGRAM": 1},
                "depth": 0
            }
        }"#;
        let resp: AstResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_valid);
        assert!(resp.ast.is_available());
        assert_eq!(resp.summary.unwrap().node_type_counts.get("PROGRAM"), Some(&1));
    }

    #[test]
    fn test_symbol_table_response_tolerates_nulls() {
        let json = r#"{"symbolTable": null, "symbolCount": 0, "semanticErrors": null}"#;
        let resp: SymbolTableResponse = serde_json::from_str(json).unwrap();
        assert!(resp.symbol_table.is_empty());
        assert!(resp.semantic_errors.is_empty());
    }

    #[test]
    fn test_structure_type_from_str() {
        assert_eq!("function".parse::<StructureType>(), Ok(StructureType::Function));
        assert!("while_loop".parse::<StructureType>().is_err());
    }
}
