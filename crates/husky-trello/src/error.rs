//! Error types for content fetching.

/// Error from fetching cards from the content provider.
///
/// Fetch failures are never retried or cached by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ContentFetchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blocking fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}
