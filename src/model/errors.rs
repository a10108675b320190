//! Syntax and semantic findings reported by the analyzer.

use serde::{Deserialize, Deserializer, Serialize};

/// Severity levels for analyzer findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Severity used for classification when the analyzer sent none.
    ///
    /// Unknown severities count as warnings so the record still shows up
    /// in the report instead of being dropped.
    pub fn effective(severity: Option<Severity>) -> Severity {
        severity.unwrap_or(Severity::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Which analysis stage produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Syntax,
    Semantic,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Syntax => "syntax",
            Origin::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Origin-specific fields carried alongside the common finding fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ErrorDetail {
    Syntax {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        found: Option<String>,
    },
    Semantic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "symbolType")]
        symbol_type: Option<String>,
    },
}

/// Common view over syntax and semantic findings.
///
/// The aggregation functions in `diagnostics` are written against this
/// trait so they work for either stream and for already-tagged records.
pub trait Finding {
    fn message(&self) -> &str;
    fn line(&self) -> usize;
    fn position(&self) -> usize;
    fn error_type(&self) -> &str;
    /// Severity as reported, `None` when the analyzer omitted it.
    fn severity(&self) -> Option<Severity>;
    fn detail(&self) -> ErrorDetail;

    fn effective_severity(&self) -> Severity {
        Severity::effective(self.severity())
    }
}

/// A syntax error reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub position: usize,
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
}

/// A semantic error reported by the type/scope checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticError {
    pub message: String,
    pub line: usize,
    pub position: usize,
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
}

impl Finding for SyntaxError {
    fn message(&self) -> &str {
        &self.message
    }

    fn line(&self) -> usize {
        self.line
    }

    fn position(&self) -> usize {
        self.position
    }

    fn error_type(&self) -> &str {
        &self.error_type
    }

    fn severity(&self) -> Option<Severity> {
        self.severity
    }

    fn detail(&self) -> ErrorDetail {
        ErrorDetail::Syntax {
            expected: self.expected.clone(),
            found: self.found.clone(),
        }
    }
}

impl Finding for SemanticError {
    fn message(&self) -> &str {
        &self.message
    }

    fn line(&self) -> usize {
        self.line
    }

    fn position(&self) -> usize {
        self.position
    }

    fn error_type(&self) -> &str {
        &self.error_type
    }

    fn severity(&self) -> Option<Severity> {
        self.severity
    }

    fn detail(&self) -> ErrorDetail {
        ErrorDetail::Semantic {
            symbol: self.symbol.clone(),
            symbol_type: self.symbol_type.clone(),
        }
    }
}

/// Accept `null`, a missing field or any value that is not a known severity
/// string as "no severity".
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(s.parse().ok()),
        _ => Ok(None),
    }
}
