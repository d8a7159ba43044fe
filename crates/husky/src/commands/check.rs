//! `husky check` command implementation.

use husky_config::{Config, ConfigError};
use husky_server::{SiteSummary, check_site};

use crate::error::CliError;
use crate::output::Output;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the configuration, page modules or templates would
/// prevent the server from starting.
pub(crate) fn execute() -> Result<(), CliError> {
    let summary = summarize(Config::from_env)?;
    tracing::debug!(routes = summary.routes.len(), "Site check passed");
    Output::new().summary(&summary);
    Ok(())
}

fn summarize<F>(load: F) -> Result<SiteSummary, CliError>
where
    F: FnOnce() -> Result<Config, ConfigError>,
{
    let config = load()?;
    Ok(check_site(&config)?)
}
