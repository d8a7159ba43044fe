//! Card source abstraction.

use async_trait::async_trait;

use crate::error::ContentFetchError;
use crate::types::Card;

/// A provider of ordered card lists.
///
/// [`TrelloClient`](crate::TrelloClient) is the production implementation;
/// tests substitute in-memory sources.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Fetch every card of `list_id`, in provider order.
    async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ContentFetchError>;
}
