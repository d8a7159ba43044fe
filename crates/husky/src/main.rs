//! Husky CLI - Trello-backed website server.
//!
//! Provides commands for:
//! - `serve`: Start the site server
//! - `check`: Validate configuration and templates without serving

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ServeArgs;
use error::CliError;
use output::Output;

/// Husky - websites from Trello boards.
#[derive(Parser)]
#[command(name = "husky", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server.
    Serve(ServeArgs),
    /// Validate configuration, page modules and templates.
    Check,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for serve command
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Check => commands::check::execute(),
    };

    if let Err(err) = result {
        tracing::debug!(error = ?err, "Command failed");
        output.error(&err);
        std::process::exit(1);
    }
}
