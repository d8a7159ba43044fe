//! CLI error types.

use husky_config::ConfigError;
use husky_server::StartupError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Startup(#[from] StartupError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
