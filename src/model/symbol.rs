//! Symbol table entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of declared symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Interface,
    Parameter,
    Property,
    Method,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 7] = [
        SymbolKind::Variable,
        SymbolKind::Function,
        SymbolKind::Class,
        SymbolKind::Interface,
        SymbolKind::Parameter,
        SymbolKind::Property,
        SymbolKind::Method,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "VARIABLE",
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Class => "CLASS",
            SymbolKind::Interface => "INTERFACE",
            SymbolKind::Parameter => "PARAMETER",
            SymbolKind::Property => "PROPERTY",
            SymbolKind::Method => "METHOD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "Variable",
            SymbolKind::Function => "Function",
            SymbolKind::Class => "Class",
            SymbolKind::Interface => "Interface",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::Property => "Property",
            SymbolKind::Method => "Method",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        SymbolKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == upper)
            .ok_or_else(|| format!("unknown symbol kind: {}", s))
    }
}

/// A declared name in the analyzed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub kind: SymbolKind,
    pub line: usize,
    pub position: usize,
    pub scope: String,
    pub used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
}

impl Symbol {
    pub fn has_attributes(&self) -> bool {
        self.attributes.as_ref().is_some_and(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str_is_case_insensitive() {
        assert_eq!("function".parse::<SymbolKind>(), Ok(SymbolKind::Function));
        assert_eq!("METHOD".parse::<SymbolKind>(), Ok(SymbolKind::Method));
        assert!("module".parse::<SymbolKind>().is_err());
    }

    #[test]
    fn test_symbol_deserializes() {
        let json = r#"{"name":"count","type":"number","kind":"VARIABLE","line":2,
            "position":5,"scope":"global","used":true,"attributes":{"const":"true"}}"#;
        let sym: Symbol = serde_json::from_str(json).unwrap();
        assert_eq!(sym.kind, SymbolKind::Variable);
        assert_eq!(sym.symbol_type, "number");
        assert!(sym.has_attributes());
    }
}
