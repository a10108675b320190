//! Fix suggestions keyed by recurring semantic error types.

use phf::phf_ordered_map;

use crate::model::{SemanticError, SyntaxError};

/// Shown whenever the parser reported anything.
pub const SYNTAX_HINT: &str = "Check that every brace, parenthesis and bracket is balanced";

/// Semantic error type → suggestion, in display order.
static SEMANTIC_HINTS: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "UNDEFINED_VARIABLE" => "Declare every variable before using it",
    "TYPE_MISMATCH" => "Make sure operand types are compatible in each operation",
    "REDECLARATION" => "Avoid declaring two variables or functions with the same name in one scope",
};

/// Suggestions relevant to the reported errors.
pub fn hints(syntax: &[SyntaxError], semantic: &[SemanticError]) -> Vec<&'static str> {
    let mut out = Vec::new();

    if !syntax.is_empty() {
        out.push(SYNTAX_HINT);
    }

    for (error_type, hint) in SEMANTIC_HINTS.entries() {
        if semantic.iter().any(|e| e.error_type == *error_type) {
            out.push(*hint);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semantic(error_type: &str) -> SemanticError {
        SemanticError {
            message: String::new(),
            line: 1,
            position: 1,
            error_type: error_type.to_string(),
            symbol: None,
            symbol_type: None,
            severity: None,
        }
    }

    #[test]
    fn test_no_errors_no_hints() {
        assert!(hints(&[], &[]).is_empty());
    }

    #[test]
    fn test_hints_follow_table_order() {
        let found = hints(
            &[],
            &[semantic("REDECLARATION"), semantic("UNDEFINED_VARIABLE")],
        );
        assert_eq!(
            found,
            vec![
                "Declare every variable before using it",
                "Avoid declaring two variables or functions with the same name in one scope",
            ]
        );
    }

    #[test]
    fn test_unknown_types_have_no_hint() {
        assert!(hints(&[], &[semantic("SHADOWED_NAME")]).is_empty());
    }
}
