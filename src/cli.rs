//! Command-line interface for astlens.

use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{AnalyzerClient, ClientError, Service, StructureType};
use crate::config::{self, Config};
use crate::diagnostics::{ErrorReport, OriginFilter};
use crate::model::ResultModel;
use crate::report;
use crate::session::Session;
use crate::symbols::{KindFilter, ScopeFilter, SymbolFilter};
use crate::tree::NodePath;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable that forces debug logging.
pub const DEBUG_ENV: &str = "ASTLENS_DEBUG";

/// Inspect what a remote analyzer makes of a source file.
///
/// astlens sends source code to an analyzer service and presents the
/// result: the token stream, a browsable syntax tree, the symbol table and
/// a ranked list of syntax and semantic errors.
#[derive(Parser)]
#[command(name = "astlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file and show every view
    Analyze(AnalyzeArgs),
    /// Show the syntax tree
    Tree(TreeArgs),
    /// Show the symbol table
    Symbols(SymbolsArgs),
    /// Show syntax and semantic errors
    #[command(visible_alias = "check")]
    Errors(ErrorsArgs),
    /// Show the token stream
    Tokens(SourceArgs),
    /// Validate a file as one specific construct
    Validate(ValidateArgs),
    /// Check that the analyzer services are reachable
    Health(HealthArgs),
    /// Create a config file from the template
    Init(InitArgs),
}

/// Where the analysis result comes from and how to print it.
#[derive(Args)]
pub struct SourceArgs {
    /// Source file to analyze
    #[arg(required_unless_present = "from_json", conflicts_with = "from_json")]
    pub file: Option<PathBuf>,

    /// Read a saved analysis result instead of calling the analyzer
    #[arg(long, value_name = "PATH")]
    pub from_json: Option<PathBuf>,

    /// Output format: pretty or json (default: from config, else pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Expand every tree node
    #[arg(long)]
    pub expand_all: bool,
}

/// Arguments for the tree command.
#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Expand every node
    #[arg(long, conflicts_with = "collapse_all")]
    pub expand_all: bool,

    /// Collapse every node
    #[arg(long)]
    pub collapse_all: bool,

    /// Toggle the node at PATH (dot-separated child indices, "." for the root)
    #[arg(short, long, value_name = "PATH")]
    pub toggle: Vec<NodePath>,

    /// Nodes shallower than this start expanded (default: from config, else 2)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Print the tree summary after the tree
    #[arg(short, long)]
    pub summary: bool,
}

/// Arguments for the symbols command.
#[derive(Args)]
pub struct SymbolsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show symbols of this kind (variable, function, class, ...)
    #[arg(short, long)]
    pub kind: Option<KindFilter>,

    /// Only show symbols declared in this scope (every scope when omitted)
    #[arg(long)]
    pub scope: Option<String>,

    /// Hide symbols that are never used
    #[arg(long)]
    pub hide_unused: bool,
}

/// Arguments for the errors command.
#[derive(Args)]
pub struct ErrorsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show findings of this origin: syntax, semantic or all
    #[arg(short, long, default_value = "all")]
    pub origin: OriginFilter,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Source file to validate
    pub file: PathBuf,

    /// Construct to validate as: for_loop, function or variable_declaration
    #[arg(short, long)]
    pub structure: StructureType,

    /// Output format: pretty or json
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the health command.
#[derive(Args)]
pub struct HealthArgs {
    /// Output format: pretty or json
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "astlens.yaml", conflicts_with = "user")]
    pub output: PathBuf,

    /// Write to the user config directory instead
    #[arg(long)]
    pub user: bool,
}

/// Set up logging on stderr.
///
/// `ASTLENS_DEBUG` forces debug output regardless of `-v`.
pub fn init_logging(verbosity: u8) {
    let level = if std::env::var_os(DEBUG_ENV).is_some() {
        log::LevelFilter::Debug
    } else {
        match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let Some((config, format)) =
        prepare(args.source.config.as_deref(), args.source.format.as_deref())?
    else {
        return Ok(EXIT_ERROR);
    };

    let model = match load_model(&args.source, &config, &format) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let mut session = Session::new(model, config.view.expand_depth());
    if args.expand_all {
        session.expand_all();
    }

    let filter = SymbolFilter::default();
    if format == "json" {
        report::write_json(&report::analysis_json(&session, &filter, OriginFilter::All))?;
    } else {
        report::write_header(&source_label(&args.source));
        report::write_analysis(&session, &filter, OriginFilter::All);
    }

    if session.model().is_valid() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the tree command.
pub fn run_tree(args: &TreeArgs) -> anyhow::Result<i32> {
    let Some((config, format)) =
        prepare(args.source.config.as_deref(), args.source.format.as_deref())?
    else {
        return Ok(EXIT_ERROR);
    };

    let model = match load_model(&args.source, &config, &format) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let depth = args.depth.unwrap_or_else(|| config.view.expand_depth());
    let mut session = Session::new(model, depth);

    if args.expand_all {
        session.expand_all();
    } else if args.collapse_all {
        session.collapse_all();
    }

    for path in &args.toggle {
        if path.resolve(session.model().ast()).is_none() {
            log::warn!("no node at path {}, ignoring", path);
            continue;
        }
        let expanded = session.toggle(path);
        log::info!(
            "{} {}",
            path,
            if expanded { "expanded" } else { "collapsed" }
        );
    }

    if format == "json" {
        report::write_json(&report::tree_json(session.tree(), session.expansion()))?;
    } else {
        report::write_header(&source_label(&args.source));
        report::write_tree(session.tree(), session.expansion());
        if args.summary {
            if let Some(summary) = session.tree().summary() {
                report::write_tree_summary(&summary);
            }
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Run the symbols command.
pub fn run_symbols(args: &SymbolsArgs) -> anyhow::Result<i32> {
    let Some((config, format)) =
        prepare(args.source.config.as_deref(), args.source.format.as_deref())?
    else {
        return Ok(EXIT_ERROR);
    };

    let model = match load_model(&args.source, &config, &format) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let filter = SymbolFilter {
        kind: args.kind.unwrap_or_default(),
        scope: ScopeFilter::from(args.scope.clone()),
        include_unused: !args.hide_unused,
    };

    let session = Session::new(model, config.view.expand_depth());
    if format == "json" {
        report::write_json(&report::symbols_json(session.symbols(), &filter))?;
    } else {
        report::write_header(&source_label(&args.source));
        report::write_symbols(session.symbols(), &filter);
    }

    Ok(EXIT_SUCCESS)
}

/// Run the errors command.
pub fn run_errors(args: &ErrorsArgs) -> anyhow::Result<i32> {
    let Some((config, format)) =
        prepare(args.source.config.as_deref(), args.source.format.as_deref())?
    else {
        return Ok(EXIT_ERROR);
    };

    let model = match load_model(&args.source, &config, &format) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let session = Session::new(model, config.view.expand_depth());
    let errors = session.errors();
    if format == "json" {
        report::write_json(&report::errors_json(&errors, args.origin))?;
    } else {
        report::write_header(&source_label(&args.source));
        report::write_errors(&errors, args.origin);
    }

    match errors {
        ErrorReport::NoErrors if session.model().is_valid() => Ok(EXIT_SUCCESS),
        _ => Ok(EXIT_FAILED),
    }
}

/// Run the tokens command.
pub fn run_tokens(args: &SourceArgs) -> anyhow::Result<i32> {
    let Some((config, format)) = prepare(args.config.as_deref(), args.format.as_deref())? else {
        return Ok(EXIT_ERROR);
    };

    let model = match load_model(args, &config, &format) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    if format == "json" {
        report::write_json(&report::tokens_json(model.tokens(), model.lexical_errors()))?;
    } else {
        report::write_header(&source_label(args));
        report::write_tokens(model.tokens(), model.lexical_errors());
    }

    if model.lexical_errors().is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the validate command.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<i32> {
    let Some((config, format)) = prepare(args.config.as_deref(), args.format.as_deref())? else {
        return Ok(EXIT_ERROR);
    };

    let code = match read_source(&args.file) {
        Ok(c) => c,
        Err(code) => return Ok(code),
    };

    let client = AnalyzerClient::new(&config.analyzer)?;
    let message = format!("validating {} as {}", args.file.display(), args.structure);
    let result = block_on(
        &message,
        format == "pretty",
        client.validate_structure(&code, args.structure),
    )?;

    let validation = match result {
        Ok(v) => v,
        Err(e) => return Ok(report_client_error(&e, &client)),
    };

    if format == "json" {
        report::write_json(&validation)?;
    } else {
        report::write_header(&args.file.display().to_string());
        report::write_validation(&validation);
    }

    if validation.is_valid {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the health command.
pub fn run_health(args: &HealthArgs) -> anyhow::Result<i32> {
    let Some((config, format)) = prepare(args.config.as_deref(), args.format.as_deref())? else {
        return Ok(EXIT_ERROR);
    };

    let client = AnalyzerClient::new(&config.analyzer)?;
    let (lexical, syntax) = block_on(
        "checking analyzer health",
        format == "pretty",
        futures::future::join(
            client.check_health(Service::Lexical),
            client.check_health(Service::Syntax),
        ),
    )?;

    if format == "json" {
        report::write_json(&serde_json::json!({
            "baseUrl": client.base_url(),
            "lexical": lexical,
            "syntax": syntax,
        }))?;
    } else {
        report::write_header(client.base_url());
        report::write_health(&[(Service::Lexical, lexical), (Service::Syntax, syntax)]);
    }

    if lexical && syntax {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    let output = if args.user {
        match config::user_config_path() {
            Some(p) => p,
            None => {
                eprintln!("Error: cannot determine the user config directory");
                return Ok(EXIT_ERROR);
            }
        }
    } else {
        args.output.clone()
    };

    // Check if output already exists
    if output.exists() {
        eprintln!("Error: file already exists: {}", output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&output, config::TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Set analyzer.base_url in {}", output.display());
    println!("  2. Run: astlens health");

    Ok(EXIT_SUCCESS)
}

/// Load the config and settle the output format.
///
/// Returns `None` after printing an error when the format is not usable.
fn prepare(
    config_path: Option<&Path>,
    format: Option<&str>,
) -> anyhow::Result<Option<(Config, String)>> {
    let config = Config::load(config_path)?;

    let format = format.unwrap_or_else(|| config.view.format()).to_string();
    if format != "pretty" && format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        return Ok(None);
    }

    Ok(Some((config, format)))
}

/// Produce the result model, either from a saved file or from the analyzer.
///
/// Failures are reported on stderr and turned into an exit code.
fn load_model(args: &SourceArgs, config: &Config, format: &str) -> Result<ResultModel, i32> {
    if let Some(path) = &args.from_json {
        return ResultModel::parse_file(path).map_err(|e| {
            eprintln!("Error reading {}: {}", path.display(), e);
            EXIT_ERROR
        });
    }

    let Some(file) = &args.file else {
        eprintln!("Error: no source file given");
        return Err(EXIT_ERROR);
    };
    let code = read_source(file)?;

    let client = AnalyzerClient::new(&config.analyzer).map_err(|e| {
        eprintln!("Error: {}", e);
        EXIT_ERROR
    })?;

    let message = format!("analyzing {}", file.display());
    let result = block_on(&message, format == "pretty", client.analyze(&code)).map_err(|e| {
        eprintln!("Error: {}", e);
        EXIT_ERROR
    })?;

    match result {
        Ok(model) => {
            log::info!(
                "analysis finished: {} tokens, {} symbols, valid: {}",
                model.tokens().len(),
                model.symbol_table().len(),
                model.is_valid()
            );
            Ok(model)
        }
        Err(e) => Err(report_client_error(&e, &client)),
    }
}

fn read_source(path: &Path) -> Result<String, i32> {
    let code = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        EXIT_ERROR
    })?;

    if code.trim().is_empty() {
        eprintln!("Error: {} contains no source code", path.display());
        return Err(EXIT_ERROR);
    }
    Ok(code)
}

fn report_client_error(e: &ClientError, client: &AnalyzerClient) -> i32 {
    eprintln!("Error: {}", e);
    if matches!(e, ClientError::Network(_) | ClientError::Timeout) {
        eprintln!(
            "Is the analyzer running at {}? Check with 'astlens health'",
            client.base_url()
        );
    }
    EXIT_ERROR
}

/// Drive `future` to completion, with a spinner on stderr when asked.
fn block_on<F: Future>(message: &str, show_progress: bool, future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });

    let output = runtime.block_on(future);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(output)
}

fn source_label(args: &SourceArgs) -> String {
    match (&args.from_json, &args.file) {
        (Some(path), _) => format!("{} (saved result)", path.display()),
        (None, Some(file)) => file.display().to_string(),
        (None, None) => String::from("-"),
    }
}
