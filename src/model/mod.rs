//! Analysis result model.
//!
//! A [`ResultModel`] holds everything one analysis run produced: the token
//! stream, the syntax tree, the symbol table and both error streams. It is
//! assembled once from the analyzer's payloads and never patched; a new run
//! produces a new model.

mod errors;
mod symbol;
mod syntax;
mod token;

pub use errors::{ErrorDetail, Finding, Origin, SemanticError, Severity, SyntaxError};
pub use symbol::{Symbol, SymbolKind};
pub use syntax::{NodeCategory, NodeType, SyntaxNode};
pub use token::{count_by_type, LexicalError, Token, TokenType};

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Payload of the lexical analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: Vec<Token>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<LexicalError>,
}

/// Payload of the syntax/semantic analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ast: SyntaxNode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub syntax_errors: Vec<SyntaxError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub semantic_errors: Vec<SemanticError>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol_table: Vec<Symbol>,
    #[serde(default)]
    pub is_valid: bool,
}

/// One analysis run's artifacts.
///
/// Fields are private so a model can only be built whole; every consumer
/// gets read access through the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultModel {
    #[serde(default, deserialize_with = "null_as_default")]
    tokens: Vec<Token>,
    #[serde(default, deserialize_with = "null_as_default")]
    lexical_errors: Vec<LexicalError>,
    #[serde(default, deserialize_with = "null_as_default")]
    ast: SyntaxNode,
    #[serde(default, deserialize_with = "null_as_default")]
    syntax_errors: Vec<SyntaxError>,
    #[serde(default, deserialize_with = "null_as_default")]
    semantic_errors: Vec<SemanticError>,
    #[serde(default, deserialize_with = "null_as_default")]
    symbol_table: Vec<Symbol>,
    #[serde(default)]
    is_valid: bool,
}

/// An ERROR-severity finding in a model that claims to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractViolation {
    pub origin: Origin,
    pub line: usize,
    pub position: usize,
    pub error_type: String,
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "model marked valid but has {} error {} at {}:{}",
            self.origin, self.error_type, self.line, self.position
        )
    }
}

impl ResultModel {
    /// Combine the lexical and syntax payloads of one run.
    pub fn assemble(lexical: LexicalAnalysis, syntax: SyntaxAnalysis) -> Self {
        Self {
            tokens: lexical.tokens,
            lexical_errors: lexical.errors,
            ast: syntax.ast,
            syntax_errors: syntax.syntax_errors,
            semantic_errors: syntax.semantic_errors,
            symbol_table: syntax.symbol_table,
            is_valid: syntax.is_valid,
        }
    }

    /// Build a model from a syntax payload alone (no token stream).
    pub fn from_syntax(syntax: SyntaxAnalysis) -> Self {
        Self::assemble(LexicalAnalysis::default(), syntax)
    }

    /// Parse a captured analyzer payload from a JSON file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let model: ResultModel = serde_json::from_str(&content)?;
        Ok(model)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lexical_errors(&self) -> &[LexicalError] {
        &self.lexical_errors
    }

    pub fn ast(&self) -> &SyntaxNode {
        &self.ast
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.syntax_errors
    }

    pub fn semantic_errors(&self) -> &[SemanticError] {
        &self.semantic_errors
    }

    pub fn symbol_table(&self) -> &[Symbol] {
        &self.symbol_table
    }

    /// Validity flag exactly as the analyzer reported it.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// ERROR-severity findings that contradict `is_valid == true`.
    ///
    /// The model is never corrected; callers decide what to do with these.
    pub fn contract_violations(&self) -> Vec<ContractViolation> {
        if !self.is_valid {
            return Vec::new();
        }

        let syntax = self
            .syntax_errors
            .iter()
            .filter(|e| e.severity == Some(Severity::Error))
            .map(|e| violation(Origin::Syntax, e));
        let semantic = self
            .semantic_errors
            .iter()
            .filter(|e| e.severity == Some(Severity::Error))
            .map(|e| violation(Origin::Semantic, e));

        syntax.chain(semantic).collect()
    }
}

fn violation<F: Finding>(origin: Origin, finding: &F) -> ContractViolation {
    ContractViolation {
        origin,
        line: finding.line(),
        position: finding.position(),
        error_type: finding.error_type().to_string(),
    }
}

/// Deserialize `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
