//! Navigation tree construction.

use husky_trello::Card;
use serde::Serialize;

use crate::registry::{PageRegistry, SiteMode};
use crate::slug::slugify;

/// Node type of card-derived navigation entries.
pub const PAGE_NODE_TYPE: &str = "page";

/// Navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteTreeNode {
    /// Display title.
    pub name: String,
    /// Link target.
    pub href: String,
    /// Module type, or `page` for card pages.
    #[serde(rename = "type")]
    pub node_type: String,
}

impl SiteTreeNode {
    fn new(name: impl Into<String>, href: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            node_type: node_type.into(),
        }
    }
}

/// Build the navigation tree for a request.
///
/// In single mode the tree is the served module alone, linked at `/`. In
/// multi mode active modules come first, in registration order, followed by
/// one node per card in list order. The card named "Home" links to `/`.
pub fn build_site_tree(
    cards: &[Card],
    registry: &PageRegistry,
    mode: &SiteMode,
) -> Vec<SiteTreeNode> {
    match mode {
        SiteMode::Single(page_type) => {
            let name = registry
                .get(page_type)
                .and_then(|module| module.display_name())
                .unwrap_or(page_type);
            vec![SiteTreeNode::new(name, "/", page_type.as_str())]
        }
        SiteMode::Multi => {
            let modules = registry.active_modules().map(|module| {
                let page_type = module.page_type();
                SiteTreeNode::new(
                    module.display_name().unwrap_or(page_type),
                    format!("/{page_type}"),
                    page_type,
                )
            });
            let pages = cards.iter().map(|card| {
                let slug = slugify(&card.name);
                let href = if slug == "home" {
                    "/".to_owned()
                } else {
                    format!("/{slug}")
                };
                SiteTreeNode::new(card.name.as_str(), href, PAGE_NODE_TYPE)
            });
            modules.chain(pages).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::module::{PageModule, RouteTable};

    struct Named(&'static str, Option<&'static str>);

    #[async_trait]
    impl PageModule for Named {
        fn page_type(&self) -> &str {
            self.0
        }

        fn display_name(&self) -> Option<&str> {
            self.1
        }

        fn routes(&self) -> RouteTable {
            RouteTable::new()
        }
    }

    fn registry() -> PageRegistry {
        PageRegistry::from_modules(vec![
            Arc::new(Named("blog", Some("Blog"))) as Arc<dyn PageModule>,
            Arc::new(Named("timeline", None)),
        ])
        .unwrap()
    }

    fn card(name: &str) -> Card {
        Card {
            name: name.to_owned(),
            ..Card::default()
        }
    }

    #[test]
    fn test_multi_mode_tree() {
        let cards = [card("Home"), card("About Us")];

        let tree = build_site_tree(&cards, &registry(), &SiteMode::Multi);

        assert_eq!(
            tree,
            [
                SiteTreeNode::new("Blog", "/blog", "blog"),
                SiteTreeNode::new("Home", "/", "page"),
                SiteTreeNode::new("About Us", "/about-us", "page"),
            ]
        );
    }

    #[test]
    fn test_multi_mode_keeps_card_order_and_duplicates() {
        let cards = [card("Zeta"), card("Alpha"), card("Blog")];

        let tree = build_site_tree(&cards, &registry(), &SiteMode::Multi);

        let hrefs: Vec<&str> = tree.iter().map(|n| n.href.as_str()).collect();
        assert_eq!(hrefs, ["/blog", "/zeta", "/alpha", "/blog"]);
    }

    #[test]
    fn test_multi_mode_home_matches_by_slug() {
        let tree = build_site_tree(&[card("  HOME ")], &registry(), &SiteMode::Multi);

        assert_eq!(tree[1].href, "/");
    }

    #[test]
    fn test_multi_mode_without_cards() {
        let tree = build_site_tree(&[], &registry(), &SiteMode::Multi);

        assert_eq!(tree, [SiteTreeNode::new("Blog", "/blog", "blog")]);
    }

    #[test]
    fn test_single_mode_tree() {
        let cards = [card("Home"), card("About Us")];
        let mode = SiteMode::Single("blog".to_owned());

        let tree = build_site_tree(&cards, &registry(), &mode);

        assert_eq!(tree, [SiteTreeNode::new("Blog", "/", "blog")]);
    }

    #[test]
    fn test_single_mode_inactive_module_uses_type_as_name() {
        let mode = SiteMode::Single("timeline".to_owned());

        let tree = build_site_tree(&[], &registry(), &mode);

        assert_eq!(tree, [SiteTreeNode::new("timeline", "/", "timeline")]);
    }

    #[test]
    fn test_node_serializes_type_field() {
        let json = serde_json::to_value(SiteTreeNode::new("Blog", "/blog", "blog")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"name": "Blog", "href": "/blog", "type": "blog"})
        );
    }
}
