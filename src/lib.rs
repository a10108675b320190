//! astlens - a client-side view over a remote code analyzer.
//!
//! An analyzer service turns source code into tokens, a syntax tree, a
//! symbol table and two streams of findings (syntax and semantic). astlens
//! fetches those artifacts once per run and derives every view from that
//! immutable snapshot.
//!
//! # Architecture
//!
//! - `model`: Wire types and the immutable [`ResultModel`]
//! - `tree`: Expansion state and the lazy visible walk over the syntax tree
//! - `symbols`: Filtering, facets and statistics for the symbol table
//! - `diagnostics`: Tagging, merging and classifying findings
//! - `client`: HTTP client for the analyzer endpoints
//! - `session`: One snapshot plus the expansion state tied to it
//! - `config`: YAML configuration
//! - `report`: Output formatting (pretty, JSON)

pub mod cli;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod report;
pub mod session;
pub mod symbols;
pub mod tree;

pub use client::{AnalyzerClient, ClientError};
pub use config::Config;
pub use diagnostics::{ErrorReport, OriginFilter, TaggedError};
pub use model::{ResultModel, SemanticError, Severity, Symbol, SymbolKind, SyntaxError, SyntaxNode};
pub use session::Session;
pub use symbols::{SymbolFilter, SymbolView};
pub use tree::{ExpansionState, NodePath, TreeView};
