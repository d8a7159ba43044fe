//! Built-in page modules.
//!
//! [`builtin`] is the registration list handed to
//! [`PageRegistry::from_modules`](crate::PageRegistry::from_modules) at
//! startup.

mod blog;
mod timeline;

use std::sync::Arc;

use husky_trello::Card;

pub use blog::BlogModule;
pub use timeline::TimelineModule;

use crate::module::{ModuleError, PageContext};
use crate::page::CardPage;

/// List ids of the built-in modules. A module without a list is inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleSettings {
    /// List holding blog posts.
    pub blog_list: Option<String>,
    /// List holding timeline entries.
    pub timeline_list: Option<String>,
}

/// Built-in modules in registration order.
#[must_use]
pub fn builtin(settings: &ModuleSettings) -> Vec<Arc<dyn crate::PageModule>> {
    vec![
        Arc::new(BlogModule::new(settings.blog_list.clone())),
        Arc::new(TimelineModule::new(settings.timeline_list.clone())),
    ]
}

/// Fetch a module's list and prepare every card as a page.
async fn load_pages(ctx: &PageContext<'_>, list_id: &str) -> Result<Vec<CardPage>, ModuleError> {
    let cards = ctx.content.fetch_cards(list_id, ctx.skip_cache).await?;
    Ok(cards.iter().map(CardPage::from_card).collect())
}

fn label_name(card: &Card) -> Option<&str> {
    card.labels
        .first()
        .map(|label| label.name.as_str())
        .filter(|name| !name.is_empty())
}
