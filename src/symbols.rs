//! Faceted filtering and statistics over the symbol table.
//!
//! Filters narrow the table row by row and never reorder it. Statistics
//! always describe the whole table so the summary stays put while the
//! operator plays with filters.

use serde::Serialize;

use crate::model::{Symbol, SymbolKind};

/// Kind predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(SymbolKind),
}

impl std::str::FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        s.parse().map(KindFilter::Only)
    }
}

/// Scope predicate. Scopes are opaque and compared by string equality; no
/// scope name is reserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeFilter {
    #[default]
    All,
    Only(String),
}

impl From<Option<String>> for ScopeFilter {
    fn from(scope: Option<String>) -> Self {
        match scope {
            Some(s) => ScopeFilter::Only(s),
            None => ScopeFilter::All,
        }
    }
}

/// Active filter configuration; every predicate must pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFilter {
    pub kind: KindFilter,
    pub scope: ScopeFilter,
    pub include_unused: bool,
}

impl Default for SymbolFilter {
    fn default() -> Self {
        Self {
            kind: KindFilter::All,
            scope: ScopeFilter::All,
            include_unused: true,
        }
    }
}

impl SymbolFilter {
    pub fn matches(&self, symbol: &Symbol) -> bool {
        let kind_match = match self.kind {
            KindFilter::All => true,
            KindFilter::Only(kind) => symbol.kind == kind,
        };
        let scope_match = match &self.scope {
            ScopeFilter::All => true,
            ScopeFilter::Only(scope) => &symbol.scope == scope,
        };
        let usage_match = self.include_unused || symbol.used;

        kind_match && scope_match && usage_match
    }

    pub fn is_active(&self) -> bool {
        *self != SymbolFilter::default()
    }
}

/// Stable subsequence of `table` matching `filter`.
pub fn filter<'a>(table: &'a [Symbol], filter: &SymbolFilter) -> Vec<&'a Symbol> {
    table.iter().filter(|s| filter.matches(s)).collect()
}

/// Distinct kinds and scopes present in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// In first-seen order
    pub kinds: Vec<SymbolKind>,
    /// In first-seen order
    pub scopes: Vec<String>,
}

pub fn facet_values(table: &[Symbol]) -> Facets {
    let mut kinds: Vec<SymbolKind> = Vec::new();
    let mut scopes: Vec<String> = Vec::new();

    for symbol in table {
        if !kinds.contains(&symbol.kind) {
            kinds.push(symbol.kind);
        }
        if !scopes.iter().any(|s| s == &symbol.scope) {
            scopes.push(symbol.scope.clone());
        }
    }

    Facets { kinds, scopes }
}

/// Count of symbols of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub kind: SymbolKind,
    pub count: usize,
}

/// Aggregate counts over an unfiltered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolStatistics {
    pub total: usize,
    pub used: usize,
    pub unused: usize,
    pub variables: usize,
    pub functions: usize,
    pub classes: usize,
    pub interfaces: usize,
    /// Every kind, including zero counts, in declaration order of `SymbolKind`
    pub by_kind: Vec<KindCount>,
}

impl SymbolStatistics {
    pub fn count_of(&self, kind: SymbolKind) -> usize {
        self.by_kind
            .iter()
            .find(|k| k.kind == kind)
            .map(|k| k.count)
            .unwrap_or(0)
    }
}

pub fn statistics(table: &[Symbol]) -> SymbolStatistics {
    let used = table.iter().filter(|s| s.used).count();
    let by_kind: Vec<KindCount> = SymbolKind::ALL
        .iter()
        .map(|&kind| KindCount {
            kind,
            count: table.iter().filter(|s| s.kind == kind).count(),
        })
        .collect();

    let count = |kind: SymbolKind| {
        by_kind
            .iter()
            .find(|k| k.kind == kind)
            .map(|k| k.count)
            .unwrap_or(0)
    };

    SymbolStatistics {
        total: table.len(),
        used,
        unused: table.len() - used,
        variables: count(SymbolKind::Variable),
        functions: count(SymbolKind::Function),
        classes: count(SymbolKind::Class),
        interfaces: count(SymbolKind::Interface),
        by_kind,
    }
}

/// Symbols carrying at least one attribute, in table order.
pub fn with_attributes<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> Vec<&'a Symbol> {
    symbols.into_iter().filter(|s| s.has_attributes()).collect()
}

/// A non-empty symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTableView<'a> {
    symbols: &'a [Symbol],
}

impl<'a> SymbolTableView<'a> {
    pub fn symbols(&self) -> &'a [Symbol] {
        self.symbols
    }

    pub fn filter(&self, f: &SymbolFilter) -> Vec<&'a Symbol> {
        filter(self.symbols, f)
    }

    pub fn facets(&self) -> Facets {
        facet_values(self.symbols)
    }

    pub fn statistics(&self) -> SymbolStatistics {
        statistics(self.symbols)
    }
}

/// Symbol table as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolView<'a> {
    NoSymbols,
    Table(SymbolTableView<'a>),
}

impl<'a> SymbolView<'a> {
    pub fn from_table(symbols: &'a [Symbol]) -> Self {
        if symbols.is_empty() {
            SymbolView::NoSymbols
        } else {
            SymbolView::Table(SymbolTableView { symbols })
        }
    }
}
