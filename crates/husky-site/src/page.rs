//! Card pages handed to rendering.

use husky_trello::Card;
use pulldown_cmark::{Options, Parser, html};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::slug::slugify;

/// A card prepared for rendering as a page.
///
/// Serializes flat: the card's own fields (`name`, `desc`, `labels`, ...)
/// sit next to the derived ones, so templates read `page.name` and
/// `page.html` alike.
#[derive(Clone, Debug, Serialize)]
pub struct CardPage {
    /// Source card.
    #[serde(flatten)]
    pub card: Card,
    /// Slug derived from the card name.
    pub slug: String,
    /// Description rendered to HTML.
    pub html: String,
    /// URL of the cover attachment, if the card has one.
    pub cover_url: Option<String>,
    /// Values added by page module processing hooks.
    pub extra: Map<String, Value>,
}

impl CardPage {
    /// Prepare a card for rendering.
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self {
            slug: slugify(&card.name),
            html: render_markdown(&card.description),
            cover_url: card.cover().map(|a| a.url.clone()),
            extra: Map::new(),
            card: card.clone(),
        }
    }
}

/// Render a markdown card description to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
