//! Error types for the HTTP server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use husky_config::ConfigError;
use husky_site::{ModuleError, RegistryError};
use husky_trello::ContentFetchError;
use serde_json::json;

use crate::render::RenderError;

/// Failure while handling a request.
///
/// Every variant becomes a 500 response with a `{"msg": ...}` body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Card fetch for the page list failed.
    #[error(transparent)]
    Content(#[from] ContentFetchError),

    /// Page module handler or hook failed.
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// Template rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        error_response(&self.to_string())
    }
}

/// Build the 500 response body shared by handler failures and panics.
pub(crate) fn error_response(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "msg": msg })),
    )
        .into_response()
}

/// Failure while building the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Page module registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// `SITE_MODE` names neither `multi` nor a registered module.
    #[error("Invalid SITE_MODE '{mode}': expected one of {}", available.join(", "))]
    InvalidSiteMode {
        /// Configured value.
        mode: String,
        /// Accepted values.
        available: Vec<String>,
    },

    /// Templates are missing or fail to parse.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Host and port do not form a socket address.
    #[error("Invalid listen address '{0}'")]
    Address(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
