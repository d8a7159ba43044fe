//! Trello REST API client.
//!
//! Provides a sync HTTP client for the Trello REST API, authenticated with
//! an application key and user token passed as query parameters.

mod lists;

use std::time::Duration;

use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Trello REST API client.
#[derive(Clone)]
pub struct TrelloClient {
    agent: Agent,
    base_url: String,
    app_key: String,
    token: String,
}

impl TrelloClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - Trello API base URL (e.g. `https://api.trello.com/1`)
    /// * `app_key` - Application key
    /// * `token` - User token
    pub fn new(base_url: &str, app_key: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            app_key: app_key.to_owned(),
            token: token.to_owned(),
        }
    }

    /// Build an absolute API URL from a path starting with `/`.
    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(TrelloClient: Send, Sync, Clone);

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = TrelloClient::new("https://api.trello.com/1/", "key", "token");

        assert_eq!(
            client.api_url("/lists/abc/cards"),
            "https://api.trello.com/1/lists/abc/cards"
        );
    }
}
