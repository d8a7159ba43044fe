//! Trello card types.
//!
//! Field names follow the Trello REST API; Rust-side names are spelled out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card from a Trello list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Provider-assigned card ID.
    pub id: String,
    /// Card title.
    pub name: String,
    /// Markdown description.
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Structured description metadata (emoji, etc).
    #[serde(rename = "descData", default)]
    pub description_data: Option<serde_json::Value>,
    /// Labels attached to the card.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Ordering key within the list.
    #[serde(rename = "pos", default)]
    pub position: f64,
    /// Card URL on trello.com.
    #[serde(default)]
    pub url: String,
    /// ID of the attachment used as the card cover.
    #[serde(rename = "idAttachmentCover", default)]
    pub cover_attachment_id: Option<String>,
    /// Last activity timestamp.
    #[serde(rename = "dateLastActivity", default)]
    pub last_activity_at: DateTime<Utc>,
    /// Card attachments (requested with `attachments=true`).
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Card members (requested with `members=true`).
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Card {
    /// Find the attachment used as the card cover.
    pub fn cover(&self) -> Option<&Attachment> {
        let cover_id = self.cover_attachment_id.as_deref()?;
        self.attachments.iter().find(|a| a.id == cover_id)
    }

    /// Whether the card carries a label with the given name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
    }
}

/// Card label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    /// Label ID.
    pub id: String,
    /// Label text (may be empty for color-only labels).
    #[serde(default)]
    pub name: String,
    /// Label color name.
    #[serde(default)]
    pub color: Option<String>,
}

/// Card attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Download URL.
    pub url: String,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Card member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Username.
    #[serde(default)]
    pub username: String,
}
