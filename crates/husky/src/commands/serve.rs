//! `husky serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use husky_config::{CliSettings, Config};
use husky_server::run_server;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Host to bind to (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Template directory (overrides TEMPLATES_DIR).
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Development mode: fetch fresh cards on every request.
    #[arg(long)]
    dev: bool,

    /// Enable verbose output (request and cache logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let mut config = Config::from_env()?;
        config.apply_cli_settings(&cli_settings);
        config.validate()?;
        tracing::info!(
            host = %config.server.host,
            port = config.server.port,
            dev_mode = config.dev_mode,
            "Configuration loaded"
        );

        Output::new().banner(&config);

        run_server(&config).await?;

        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            dev_mode: self.dev.then_some(true),
            templates_dir: self.templates_dir.clone(),
        }
    }
}
