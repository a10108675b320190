//! Token stream produced by the lexical analyzer.

use serde::{Deserialize, Serialize};

/// Token categories emitted by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    ReservedWord,
    Identifier,
    Number,
    Operator,
    Delimiter,
    SyntaxError,
    Eof,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::ReservedWord => "RESERVED_WORD",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Number => "NUMBER",
            TokenType::Operator => "OPERATOR",
            TokenType::Delimiter => "DELIMITER",
            TokenType::SyntaxError => "SYNTAX_ERROR",
            TokenType::Eof => "EOF",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TokenType::ReservedWord => "Reserved word",
            TokenType::Identifier => "Identifier",
            TokenType::Number => "Number",
            TokenType::Operator => "Operator",
            TokenType::Delimiter => "Delimiter",
            TokenType::SyntaxError => "Syntax error",
            TokenType::Eof => "End of file",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: String,
    pub line: usize,
    pub position: usize,
}

/// An error reported by the lexical stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalError {
    pub message: String,
    pub line: usize,
    pub position: usize,
}

/// Count tokens per type, in order of first appearance.
pub fn count_by_type(tokens: &[Token]) -> Vec<(TokenType, usize)> {
    let mut counts: Vec<(TokenType, usize)> = Vec::new();
    for token in tokens {
        match counts.iter_mut().find(|(t, _)| *t == token.token_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((token.token_type, 1)),
        }
    }
    counts
}
