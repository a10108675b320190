//! Aggregation of syntax and semantic errors into one ranked report.
//!
//! The two streams arrive separately, each in its own order. They are
//! tagged with their origin, concatenated (syntax first) and stably sorted
//! by `(line, position)`, so ties keep syntax findings ahead of semantic
//! ones and each stream's own order.

mod hints;

pub use hints::{hints, SYNTAX_HINT};

pub use crate::model::Origin;

use serde::Serialize;
use std::collections::HashMap;

use crate::model::{ErrorDetail, Finding, ResultModel, SemanticError, Severity, SyntaxError};

/// Which findings to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginFilter {
    #[default]
    All,
    Syntax,
    Semantic,
}

impl OriginFilter {
    fn accepts(&self, origin: Origin) -> bool {
        match self {
            OriginFilter::All => true,
            OriginFilter::Syntax => origin == Origin::Syntax,
            OriginFilter::Semantic => origin == Origin::Semantic,
        }
    }
}

impl std::str::FromStr for OriginFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(OriginFilter::All),
            "syntax" => Ok(OriginFilter::Syntax),
            "semantic" => Ok(OriginFilter::Semantic),
            _ => Err(format!(
                "unknown origin {:?}, must be 'syntax', 'semantic' or 'all'",
                s
            )),
        }
    }
}

/// A finding together with the stage that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedError {
    pub origin: Origin,
    pub message: String,
    pub line: usize,
    pub position: usize,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub detail: ErrorDetail,
}

impl Finding for TaggedError {
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
        self.detail.clone()
    }
}

/// Attach `origin` to every finding of a stream. Other fields are copied
/// unchanged.
pub fn tag<F: Finding>(stream: &[F], origin: Origin) -> Vec<TaggedError> {
    stream
        .iter()
        .map(|e| TaggedError {
            origin,
            message: e.message().to_string(),
            line: e.line(),
            position: e.position(),
            error_type: e.error_type().to_string(),
            severity: e.severity(),
            detail: e.detail(),
        })
        .collect()
}

/// Syntax then semantic findings, stably sorted by `(line, position)`.
pub fn merge(syntax: &[SyntaxError], semantic: &[SemanticError]) -> Vec<TaggedError> {
    let mut merged = tag(syntax, Origin::Syntax);
    merged.extend(tag(semantic, Origin::Semantic));
    // sort_by_key is stable
    merged.sort_by_key(|e| (e.line, e.position));
    merged
}

/// Findings from one origin, keeping merge order.
pub fn filter_by_origin(merged: &[TaggedError], origin: OriginFilter) -> Vec<&TaggedError> {
    merged.iter().filter(|e| origin.accepts(e.origin)).collect()
}

/// Error and warning counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }
}

impl std::ops::Add for SeverityCounts {
    type Output = SeverityCounts;

    fn add(self, other: SeverityCounts) -> SeverityCounts {
        SeverityCounts {
            errors: self.errors + other.errors,
            warnings: self.warnings + other.warnings,
        }
    }
}

/// Partition a stream by severity. Missing severities count as warnings.
pub fn classify<F: Finding>(stream: &[F]) -> SeverityCounts {
    stream
        .iter()
        .fold(SeverityCounts::default(), |mut counts, e| {
            match e.effective_severity() {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
            }
            counts
        })
}

/// Occurrences of one error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub error_type: String,
    pub count: usize,
}

/// Occurrences per distinct `error_type`, in first-seen order.
pub fn common_types<F: Finding>(stream: &[F]) -> Vec<TypeCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TypeCount> = Vec::new();

    for e in stream {
        match index.get(e.error_type()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(e.error_type(), counts.len());
                counts.push(TypeCount {
                    error_type: e.error_type().to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Aggregated findings of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary {
    pub merged: Vec<TaggedError>,
    pub syntax_total: usize,
    pub semantic_total: usize,
    pub syntax: SeverityCounts,
    pub semantic: SeverityCounts,
    pub combined: SeverityCounts,
    pub syntax_types: Vec<TypeCount>,
    pub semantic_types: Vec<TypeCount>,
    pub hints: Vec<&'static str>,
}

impl ErrorSummary {
    pub fn total(&self) -> usize {
        self.merged.len()
    }

    /// Findings for one tab of the report.
    pub fn view(&self, origin: OriginFilter) -> Vec<&TaggedError> {
        filter_by_origin(&self.merged, origin)
    }
}

/// The error report, or the fact that there is nothing to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    NoErrors,
    Report(ErrorSummary),
}

impl ErrorReport {
    pub fn build(syntax: &[SyntaxError], semantic: &[SemanticError]) -> Self {
        if syntax.is_empty() && semantic.is_empty() {
            return ErrorReport::NoErrors;
        }

        let syntax_counts = classify(syntax);
        let semantic_counts = classify(semantic);

        ErrorReport::Report(ErrorSummary {
            merged: merge(syntax, semantic),
            syntax_total: syntax.len(),
            semantic_total: semantic.len(),
            syntax: syntax_counts,
            semantic: semantic_counts,
            combined: syntax_counts + semantic_counts,
            syntax_types: common_types(syntax),
            semantic_types: common_types(semantic),
            hints: hints(syntax, semantic),
        })
    }

    pub fn from_model(model: &ResultModel) -> Self {
        Self::build(model.syntax_errors(), model.semantic_errors())
    }

    pub fn total(&self) -> usize {
        match self {
            ErrorReport::NoErrors => 0,
            ErrorReport::Report(summary) => summary.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax(line: usize, position: usize, error_type: &str, severity: Option<Severity>) -> SyntaxError {
        SyntaxError {
            message: format!("{} at {}:{}", error_type, line, position),
            line,
            position,
            error_type: error_type.to_string(),
            expected: None,
            found: None,
            severity,
        }
    }

    fn semantic(line: usize, position: usize, error_type: &str, severity: Option<Severity>) -> SemanticError {
        SemanticError {
            message: format!("{} at {}:{}", error_type, line, position),
            line,
            position,
            error_type: error_type.to_string(),
            symbol: None,
            symbol_type: None,
            severity,
        }
    }

    #[test]
    fn test_tie_puts_syntax_first() {
        let s = vec![syntax(3, 1, "UNEXPECTED_TOKEN", Some(Severity::Error))];
        let m = vec![semantic(3, 1, "UNDEFINED_VARIABLE", Some(Severity::Error))];

        let merged = merge(&s, &m);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].origin, Origin::Syntax);
        assert_eq!(merged[0].error_type, "UNEXPECTED_TOKEN");
        assert_eq!(merged[1].origin, Origin::Semantic);
        assert_eq!(merged[1].error_type, "UNDEFINED_VARIABLE");
    }

    #[test]
    fn test_merge_orders_by_line_then_position() {
        let s = vec![
            syntax(5, 2, "A", None),
            syntax(1, 9, "B", None),
        ];
        let m = vec![
            semantic(1, 3, "C", None),
            semantic(5, 1, "D", None),
        ];
        let order: Vec<_> = merge(&s, &m).into_iter().map(|e| e.error_type).collect();
        assert_eq!(order, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_merge_keeps_in_stream_order_on_ties() {
        let s = vec![
            syntax(2, 2, "FIRST", None),
            syntax(2, 2, "SECOND", None),
        ];
        let m = vec![
            semantic(2, 2, "THIRD", None),
            semantic(2, 2, "FOURTH", None),
        ];
        let order: Vec<_> = merge(&s, &m).into_iter().map(|e| e.error_type).collect();
        assert_eq!(order, vec!["FIRST", "SECOND", "THIRD", "FOURTH"]);
    }

    #[test]
    fn test_tag_copies_fields() {
        let s = vec![SyntaxError {
            expected: Some(";".to_string()),
            found: Some("let".to_string()),
            ..syntax(4, 7, "MISSING_SEMICOLON", Some(Severity::Warning))
        }];
        let tagged = tag(&s, Origin::Syntax);
        assert_eq!(tagged[0].line, 4);
        assert_eq!(tagged[0].position, 7);
        assert_eq!(tagged[0].message, s[0].message);
        assert_eq!(tagged[0].severity, Some(Severity::Warning));
        assert_eq!(
            tagged[0].detail,
            ErrorDetail::Syntax {
                expected: Some(";".to_string()),
                found: Some("let".to_string()),
            }
        );
    }

    #[test]
    fn test_filter_by_origin() {
        let s = vec![syntax(2, 1, "A", None), syntax(8, 1, "B", None)];
        let m = vec![semantic(5, 1, "C", None)];
        let merged = merge(&s, &m);

        let only_semantic = filter_by_origin(&merged, OriginFilter::Semantic);
        assert_eq!(only_semantic.len(), 1);
        assert_eq!(only_semantic[0].error_type, "C");

        let only_syntax: Vec<_> = filter_by_origin(&merged, OriginFilter::Syntax)
            .into_iter()
            .map(|e| e.error_type.as_str())
            .collect();
        assert_eq!(only_syntax, vec!["A", "B"]);

        let all = filter_by_origin(&merged, OriginFilter::All);
        assert_eq!(all.len(), merged.len());
        assert!(all.iter().zip(&merged).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_classify_missing_severity_is_warning() {
        let s = vec![
            syntax(1, 1, "A", Some(Severity::Error)),
            syntax(2, 1, "B", None),
            syntax(3, 1, "C", Some(Severity::Warning)),
        ];
        assert_eq!(
            classify(&s),
            SeverityCounts {
                errors: 1,
                warnings: 2
            }
        );
    }

    #[test]
    fn test_classify_is_additive_over_merge() {
        let s = vec![
            syntax(1, 1, "A", Some(Severity::Error)),
            syntax(2, 1, "B", None),
        ];
        let m = vec![
            semantic(1, 1, "C", Some(Severity::Warning)),
            semantic(4, 1, "D", Some(Severity::Error)),
            semantic(6, 1, "E", Some(Severity::Error)),
        ];
        assert_eq!(classify(&merge(&s, &m)), classify(&s) + classify(&m));
    }

    #[test]
    fn test_common_types_counts_in_first_seen_order() {
        let m = vec![
            semantic(1, 1, "TYPE_MISMATCH", None),
            semantic(2, 1, "UNDEFINED_VARIABLE", None),
            semantic(3, 1, "TYPE_MISMATCH", None),
        ];
        assert_eq!(
            common_types(&m),
            vec![
                TypeCount {
                    error_type: "TYPE_MISMATCH".to_string(),
                    count: 2
                },
                TypeCount {
                    error_type: "UNDEFINED_VARIABLE".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_empty_streams_report_no_errors() {
        assert_eq!(ErrorReport::build(&[], &[]), ErrorReport::NoErrors);
        assert_eq!(ErrorReport::build(&[], &[]).total(), 0);
    }

    #[test]
    fn test_report_totals() {
        let s = vec![syntax(1, 1, "UNEXPECTED_TOKEN", Some(Severity::Error))];
        let m = vec![
            semantic(2, 1, "UNDEFINED_VARIABLE", Some(Severity::Error)),
            semantic(3, 1, "UNUSED_VARIABLE", Some(Severity::Warning)),
        ];
        let summary = match ErrorReport::build(&s, &m) {
            ErrorReport::Report(summary) => summary,
            ErrorReport::NoErrors => panic!("expected a report"),
        };
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.syntax_total, 1);
        assert_eq!(summary.semantic_total, 2);
        assert_eq!(summary.combined, SeverityCounts { errors: 2, warnings: 1 });
        assert_eq!(summary.view(OriginFilter::Semantic).len(), 2);
        assert_eq!(summary.hints.len(), 2);
    }

    #[test]
    fn test_origin_filter_from_str() {
        assert_eq!("Syntax".parse::<OriginFilter>(), Ok(OriginFilter::Syntax));
        assert_eq!("all".parse::<OriginFilter>(), Ok(OriginFilter::All));
        assert!("lexical".parse::<OriginFilter>().is_err());
    }
}
