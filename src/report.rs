//! Output formatting for analysis views.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::client::{Service, StructureValidation};
use crate::diagnostics::{ErrorReport, OriginFilter, SeverityCounts, TaggedError, TypeCount};
use crate::model::{
    count_by_type, ContractViolation, ErrorDetail, LexicalError, Origin, Severity, Symbol,
    SyntaxNode, Token,
};
use crate::session::Session;
use crate::symbols::{Facets, SymbolFilter, SymbolStatistics, SymbolView};
use crate::tree::{ExpansionState, NodePath, TreeSummary, TreeView};

// =============================================================================
// JSON Format
// =============================================================================

/// One visible row of the tree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTreeNode {
    pub path: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub line: usize,
    pub position: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub is_last_sibling: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct JsonTree {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TreeSummary>,
    pub nodes: Vec<JsonTreeNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSymbols {
    /// "ok" or "no_symbols"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SymbolStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonErrors {
    /// "ok" or "no_errors"
    pub status: &'static str,
    pub origin: &'static str,
    pub total: usize,
    pub syntax: SeverityCounts,
    pub semantic: SeverityCounts,
    pub combined: SeverityCounts,
    pub errors: Vec<TaggedError>,
    pub syntax_types: Vec<TypeCount>,
    pub semantic_types: Vec<TypeCount>,
    pub hints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTokenCount {
    #[serde(rename = "type")]
    pub token_type: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTokens {
    pub count: usize,
    pub by_type: Vec<JsonTokenCount>,
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<LexicalError>,
}

/// Everything one run produced, as shown by `astlens analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAnalysisReport {
    pub version: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contract_violations: Vec<ContractViolation>,
    pub tokens: JsonTokens,
    pub tree: JsonTree,
    pub symbols: JsonSymbols,
    pub errors: JsonErrors,
}

pub fn tree_json(view: TreeView<'_>, state: &ExpansionState) -> JsonTree {
    let nodes = view
        .visible(state)
        .map(|row| JsonTreeNode {
            path: row.path.to_string(),
            depth: row.depth,
            node_type: row.node.raw_type().map(str::to_string),
            label: row.node.label().to_string(),
            value: row.node.display_value().map(str::to_string),
            line: row.node.line,
            position: row.node.position,
            has_children: row.node.has_children(),
            expanded: row.node.has_children() && state.is_expanded(&row.path),
            is_last_sibling: row.is_last_sibling,
            attributes: row
                .node
                .attribute_pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
        .collect();

    JsonTree {
        available: view.is_available(),
        summary: view.summary(),
        nodes,
    }
}

pub fn symbols_json(view: SymbolView<'_>, filter: &SymbolFilter) -> JsonSymbols {
    match view {
        SymbolView::NoSymbols => JsonSymbols {
            status: "no_symbols",
            statistics: None,
            facets: None,
            symbols: Vec::new(),
        },
        SymbolView::Table(table) => JsonSymbols {
            status: "ok",
            statistics: Some(table.statistics()),
            facets: Some(table.facets()),
            symbols: table.filter(filter).into_iter().cloned().collect(),
        },
    }
}

pub fn errors_json(report: &ErrorReport, origin: OriginFilter) -> JsonErrors {
    match report {
        ErrorReport::NoErrors => JsonErrors {
            status: "no_errors",
            origin: origin_filter_str(origin),
            total: 0,
            syntax: SeverityCounts::default(),
            semantic: SeverityCounts::default(),
            combined: SeverityCounts::default(),
            errors: Vec::new(),
            syntax_types: Vec::new(),
            semantic_types: Vec::new(),
            hints: Vec::new(),
        },
        ErrorReport::Report(summary) => JsonErrors {
            status: "ok",
            origin: origin_filter_str(origin),
            total: summary.total(),
            syntax: summary.syntax,
            semantic: summary.semantic,
            combined: summary.combined,
            errors: summary.view(origin).into_iter().cloned().collect(),
            syntax_types: summary.syntax_types.clone(),
            semantic_types: summary.semantic_types.clone(),
            hints: summary.hints.clone(),
        },
    }
}

pub fn tokens_json(tokens: &[Token], lexical_errors: &[LexicalError]) -> JsonTokens {
    JsonTokens {
        count: tokens.len(),
        by_type: count_by_type(tokens)
            .into_iter()
            .map(|(t, count)| JsonTokenCount {
                token_type: t.as_str().to_string(),
                count,
            })
            .collect(),
        tokens: tokens.to_vec(),
        lexical_errors: lexical_errors.to_vec(),
    }
}

pub fn analysis_json(
    session: &Session,
    filter: &SymbolFilter,
    origin: OriginFilter,
) -> JsonAnalysisReport {
    let model = session.model();
    JsonAnalysisReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        is_valid: model.is_valid(),
        contract_violations: model.contract_violations(),
        tokens: tokens_json(model.tokens(), model.lexical_errors()),
        tree: tree_json(session.tree(), session.expansion()),
        symbols: symbols_json(session.symbols(), filter),
        errors: errors_json(&session.errors(), origin),
    }
}

/// Print any serializable report as pretty JSON on stdout.
pub fn write_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn origin_filter_str(origin: OriginFilter) -> &'static str {
    match origin {
        OriginFilter::All => "all",
        OriginFilter::Syntax => "syntax",
        OriginFilter::Semantic => "semantic",
    }
}

// =============================================================================
// Pretty Format
// =============================================================================

/// A tree row with its connector drawing resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    /// Vertical guides inherited from ancestors
    pub prefix: String,
    /// `├─ `, `└─ ` or empty for the root
    pub connector: &'static str,
    /// `▼` expanded, `▶` collapsed, space for leaves
    pub marker: &'static str,
    pub node: &'a SyntaxNode,
    pub path: NodePath,
}

/// Resolve connectors for every visible row.
pub fn tree_rows<'a>(view: TreeView<'a>, state: &ExpansionState) -> Vec<TreeRow<'a>> {
    let mut lasts: Vec<bool> = Vec::new();
    let mut rows = Vec::new();

    for row in view.visible(state) {
        let (prefix, connector) = if row.depth == 0 {
            lasts.clear();
            (String::new(), "")
        } else {
            lasts.truncate(row.depth - 1);
            let prefix: String = lasts
                .iter()
                .map(|&last| if last { "   " } else { "│  " })
                .collect();
            lasts.push(row.is_last_sibling);
            (prefix, if row.is_last_sibling { "└─ " } else { "├─ " })
        };

        let marker = if !row.node.has_children() {
            " "
        } else if state.is_expanded(&row.path) {
            "▼"
        } else {
            "▶"
        };

        rows.push(TreeRow {
            prefix,
            connector,
            marker,
            node: row.node,
            path: row.path,
        });
    }

    rows
}

/// Write the run header.
pub fn write_header(source: &str) {
    println!();
    print!("  ");
    print!("{}", "astlens".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", "Source: ".dimmed());
    println!("{}", source);
    println!();
}

/// Write the validity line plus any contract violations.
pub fn write_status(is_valid: bool, violations: &[ContractViolation]) {
    if is_valid {
        println!("  {}", "✓ VALID".green());
    } else {
        println!("  {}", "✗ INVALID".red());
    }

    for v in violations {
        println!("    {} {}", "!".yellow().bold(), v.to_string().yellow());
    }
    println!();
}

/// Write everything one run produced.
pub fn write_analysis(session: &Session, filter: &SymbolFilter, origin: OriginFilter) {
    let model = session.model();
    write_status(model.is_valid(), &model.contract_violations());
    write_tokens(model.tokens(), model.lexical_errors());
    write_tree(session.tree(), session.expansion());
    if let Some(summary) = session.tree().summary() {
        write_tree_summary(&summary);
    }
    write_symbols(session.symbols(), filter);
    write_errors(&session.errors(), origin);
}

pub fn write_tree(view: TreeView<'_>, state: &ExpansionState) {
    println!("  {}", "Syntax tree".bold());
    println!();

    if !view.is_available() {
        println!("    {}", "No syntax tree to show".dimmed());
        println!();
        return;
    }

    for row in tree_rows(view, state) {
        print!("    {}{}", row.prefix.dimmed(), row.connector.dimmed());
        print!("{} ", row.marker.dimmed());
        print!("{}", colored_label(row.node));
        if let Some(value) = row.node.display_value() {
            print!(" {}", format!("{:?}", value).green());
        }
        print!(" {}", format!("{}:{}", row.node.line, row.node.position).dimmed());
        for (k, v) in row.node.attribute_pairs() {
            print!(" {}", format!("{}={:?}", k, v).magenta());
        }
        println!();
    }
    println!();
}

fn colored_label(node: &SyntaxNode) -> ColoredString {
    use crate::model::NodeCategory;

    let label = node.label();
    match node.node_type().map(|t| t.category()) {
        Some(NodeCategory::Program) => label.white().bold(),
        Some(NodeCategory::Declaration) => label.blue(),
        Some(NodeCategory::Expression) => label.yellow(),
        Some(NodeCategory::Statement) => label.cyan(),
        Some(NodeCategory::Type) => label.magenta(),
        Some(NodeCategory::Error) => label.red().bold(),
        None => node.raw_type().unwrap_or(label).dimmed(),
    }
}

pub fn write_tree_summary(summary: &TreeSummary) {
    println!("  {}", "Tree summary:".bold());
    println!("    {:<14} {}", "Root:", summary.node_type);
    println!("    {:<14} {}", "Children:", summary.child_count);
    println!("    {:<14} {}", "Nodes:", summary.node_count);
    println!("    {:<14} {}", "Max depth:", summary.max_depth);
    println!(
        "    {:<14} {}:{}",
        "Position:", summary.line, summary.position
    );
    if summary.has_errors {
        println!("    {}", "Contains syntax error nodes".red());
    }

    let mut counts: Vec<_> = summary.node_type_counts.iter().collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    for c in counts {
        println!("      {:<24} {:>4}", c.node_type.label(), c.count);
    }
    println!();
}

pub fn write_symbols(view: SymbolView<'_>, filter: &SymbolFilter) {
    let table = match view {
        SymbolView::NoSymbols => {
            println!("  {}", "Symbol table".bold());
            println!();
            println!("    {}", "No symbols in the table".dimmed());
            println!();
            return;
        }
        SymbolView::Table(table) => table,
    };

    let shown = table.filter(filter);
    let plural = if shown.len() != 1 { "s" } else { "" };
    println!(
        "  {} ({} symbol{}):",
        "Symbol table".bold(),
        shown.len(),
        plural
    );
    println!();

    let stats = table.statistics();
    println!(
        "    {}  {}  {}  {}",
        format!("total {}", stats.total).bold(),
        format!("used {}", stats.used).green(),
        format!("unused {}", stats.unused).yellow(),
        format!(
            "variables {}  functions {}  classes {}  interfaces {}",
            stats.variables, stats.functions, stats.classes, stats.interfaces
        )
        .dimmed()
    );
    if filter.is_active() {
        let facets = table.facets();
        let kinds: Vec<&str> = facets.kinds.iter().map(|k| k.as_str()).collect();
        println!(
            "    {}",
            format!(
                "filters available: kinds [{}], scopes [{}]",
                kinds.join(", "),
                facets.scopes.join(", ")
            )
            .dimmed()
        );
    }
    println!();

    if shown.is_empty() {
        println!("    {}", "No symbols match the current filters".dimmed());
        println!();
        return;
    }

    println!(
        "    {}",
        format!(
            "{:<20} {:<14} {:<11} {:<14} {:<9} STATUS",
            "NAME", "TYPE", "KIND", "SCOPE", "POS"
        )
        .dimmed()
    );
    for s in &shown {
        let status = if s.used {
            "used".green()
        } else {
            "unused".yellow()
        };
        println!(
            "    {} {:<14} {:<11} {} {:<9} {}",
            format!("{:<20}", s.name).bold(),
            s.symbol_type,
            s.kind.label(),
            format!("{:<14}", s.scope).blue(),
            format!("{}:{}", s.line, s.position),
            status
        );
    }

    let detailed = crate::symbols::with_attributes(shown.iter().copied());
    if !detailed.is_empty() {
        println!();
        println!("    {}", "Attributes:".dimmed());
        for s in detailed {
            let pairs: Vec<String> = s
                .attributes
                .iter()
                .flatten()
                .map(|(k, v)| format!("{}={:?}", k, v))
                .collect();
            println!("      {:<18} {}", s.name, pairs.join(" ").magenta());
        }
    }
    println!();
}

pub fn write_errors(report: &ErrorReport, origin: OriginFilter) {
    let summary = match report {
        ErrorReport::NoErrors => {
            println!("  {}", "Errors".bold());
            println!();
            println!("    {}", "✓ No syntax or semantic errors found".green());
            println!();
            return;
        }
        ErrorReport::Report(summary) => summary,
    };

    let total = summary.total();
    let plural = if total != 1 { "s" } else { "" };
    println!("  {} ({} finding{}):", "Errors".bold(), total, plural);
    println!();
    println!(
        "    syntax   {} errors, {} warnings",
        summary.syntax.errors.to_string().red(),
        summary.syntax.warnings.to_string().yellow()
    );
    println!(
        "    semantic {} errors, {} warnings",
        summary.semantic.errors.to_string().red(),
        summary.semantic.warnings.to_string().yellow()
    );
    println!();

    let shown = summary.view(origin);
    if origin != OriginFilter::All {
        println!(
            "    {}",
            format!("showing {} only ({})", origin_filter_str(origin), shown.len()).dimmed()
        );
        println!();
    }

    for e in shown {
        write_tagged_error(e);
    }

    write_type_counts("Common syntax errors", &summary.syntax_types);
    write_type_counts("Common semantic errors", &summary.semantic_types);

    if !summary.hints.is_empty() {
        println!("  {}", "Hints:".bold());
        for hint in &summary.hints {
            println!("    • {}", hint);
        }
        println!();
    }
}

fn write_tagged_error(e: &TaggedError) {
    match e.severity {
        Some(Severity::Error) => print!("    {} ", "ERROR".red()),
        Some(Severity::Warning) => print!("    {} ", "WARN ".yellow()),
        None => print!("    {} ", "?    ".yellow()),
    }
    match e.origin {
        Origin::Syntax => print!("{} ", format!("{:<8}", "syntax").blue()),
        Origin::Semantic => print!("{} ", format!("{:<8}", "semantic").magenta()),
    }
    print!("{} ", format!("{:<21}", e.error_type).dimmed());
    println!("{}", format!("{}:{}", e.line, e.position).dimmed());

    println!("            {}", e.message);
    match &e.detail {
        ErrorDetail::Syntax { expected, found } => {
            if let Some(expected) = expected {
                print!("            {} {}", "expected".dimmed(), expected);
                if let Some(found) = found {
                    print!(", {} {}", "found".dimmed(), found);
                }
                println!();
            }
        }
        ErrorDetail::Semantic {
            symbol,
            symbol_type,
        } => {
            if let Some(symbol) = symbol {
                print!("            {} {}", "symbol".dimmed(), symbol);
                if let Some(t) = symbol_type {
                    print!(" {}", format!("({})", t).dimmed());
                }
                println!();
            }
        }
    }
    println!();
}

fn write_type_counts(title: &str, counts: &[TypeCount]) {
    if counts.is_empty() {
        return;
    }
    println!("  {}", format!("{}:", title).bold());
    for c in counts {
        println!("    {:<28} {:>3}", c.error_type.replace('_', " "), c.count);
    }
    println!();
}

pub fn write_tokens(tokens: &[Token], lexical_errors: &[LexicalError]) {
    if tokens.is_empty() {
        println!("  {}", "Tokens".bold());
        println!();
        println!("    {}", "No tokens to show".dimmed());
        println!();
    } else {
        let plural = if tokens.len() != 1 { "s" } else { "" };
        println!("  {} ({} token{}):", "Tokens".bold(), tokens.len(), plural);
        println!();
        println!(
            "    {}",
            format!("{:<16} {:<20} {:>6} {:>6}", "TYPE", "VALUE", "LINE", "POS").dimmed()
        );
        for t in tokens {
            println!(
                "    {} {:<20} {:>6} {:>6}",
                format!("{:<16}", t.token_type.label()).cyan(),
                t.value,
                t.line,
                t.position
            );
        }
        println!();
    }

    if !lexical_errors.is_empty() {
        println!("  {} ({}):", "Lexical errors".bold(), lexical_errors.len());
        for e in lexical_errors {
            println!(
                "    {} {} {}",
                "ERROR".red(),
                format!("{}:{}", e.line, e.position).dimmed(),
                e.message
            );
        }
        println!();
    }
}

pub fn write_validation(validation: &StructureValidation) {
    print!("  {} ", "Structure:".dimmed());
    print!("{} ", validation.structure_type);
    if validation.is_valid {
        println!("{}", "✓ VALID".green());
    } else {
        println!("{}", "✗ INVALID".red());
    }
    println!();

    for (title, errors) in [
        ("Structure errors", &validation.structure_errors),
        ("General errors", &validation.general_errors),
    ] {
        if errors.is_empty() {
            continue;
        }
        println!("  {} ({}):", title.bold(), errors.len());
        for e in crate::diagnostics::tag(errors, Origin::Syntax) {
            write_tagged_error(&e);
        }
    }
}

pub fn write_health(results: &[(Service, bool)]) {
    for (service, healthy) in results {
        print!("  {:<10}", service.as_str());
        if *healthy {
            println!("{}", "UP".green());
        } else {
            println!("{}", "DOWN".red());
        }
    }
}
