//! Trello content source for Husky.
//!
//! This crate provides:
//! - [`TrelloClient`]: HTTP client for the Trello list cards endpoint
//! - [`CardSource`]: the seam between card consumers and the provider
//! - [`ContentClient`]: TTL-cached, single-flight card fetching
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), husky_trello::ContentFetchError> {
//! use std::sync::Arc;
//! use husky_trello::{ContentClient, TrelloClient};
//!
//! let trello = TrelloClient::new("https://api.trello.com/1", "key", "token");
//! let content = ContentClient::new(Arc::new(trello));
//!
//! let cards = content.fetch_cards("5f0c0ffee", false).await?;
//! for card in cards.iter() {
//!     println!("{}", card.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod content;
mod error;
mod source;
mod types;

pub use client::TrelloClient;
pub use content::{Cards, ContentClient, DEFAULT_TTL};
pub use error::ContentFetchError;
pub use source::CardSource;
pub use types::{Attachment, Card, Label, Member};
