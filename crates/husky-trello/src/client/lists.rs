//! List operations for the Trello API.

use async_trait::async_trait;
use tracing::info;

use super::TrelloClient;
use crate::error::ContentFetchError;
use crate::source::CardSource;
use crate::types::Card;

/// Card fields requested from the provider.
pub(crate) const CARD_FIELDS: &str =
    "desc,descData,labels,name,pos,url,idAttachmentCover,dateLastActivity";

impl TrelloClient {
    /// Get all open cards of a list, in list order.
    pub fn get_list_cards(&self, list_id: &str) -> Result<Vec<Card>, ContentFetchError> {
        let url = self.api_url(&format!("/lists/{list_id}/cards"));

        info!("Fetching cards for list {}", list_id);

        let response = self
            .agent
            .get(&url)
            .query("fields", CARD_FIELDS)
            .query("attachments", "true")
            .query("members", "true")
            .query("key", &self.app_key)
            .query("token", &self.token)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ContentFetchError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body = body_reader.read_to_string()?;
        let cards: Vec<Card> = serde_json::from_str(&body)?;
        info!("Found {} cards in list {}", cards.len(), list_id);
        Ok(cards)
    }
}

#[async_trait]
impl CardSource for TrelloClient {
    async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ContentFetchError> {
        let client = self.clone();
        let list_id = list_id.to_owned();

        tokio::task::spawn_blocking(move || client.get_list_cards(&list_id))
            .await
            .map_err(|e| ContentFetchError::Task(e.to_string()))?
    }
}
