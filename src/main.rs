//! astlens CLI entry point.

use astlens::cli::{self, Cli, Commands, EXIT_ERROR};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args),
        Commands::Tree(args) => cli::run_tree(args),
        Commands::Symbols(args) => cli::run_symbols(args),
        Commands::Errors(args) => cli::run_errors(args),
        Commands::Tokens(args) => cli::run_tokens(args),
        Commands::Validate(args) => cli::run_validate(args),
        Commands::Health(args) => cli::run_health(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
