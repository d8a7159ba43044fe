//! Registry of page modules and site mode selection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::module::{ModuleError, PageModule};
use crate::page::CardPage;
use crate::site_tree::PAGE_NODE_TYPE;
use crate::slug::slugify;

/// Site mode value that aggregates every active module and card page.
pub const MULTI_MODE: &str = "multi";

/// Process-wide serving mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteMode {
    /// Serve all active modules plus card pages with full navigation.
    Multi,
    /// Serve a single module at the site root.
    Single(String),
}

impl SiteMode {
    /// Whether this is [`SiteMode::Multi`].
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi)
    }

    /// The configuration value for this mode.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Multi => MULTI_MODE,
            Self::Single(page_type) => page_type,
        }
    }
}

impl fmt::Display for SiteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SiteMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error building a [`PageRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two modules share a type.
    #[error("Duplicate page module type '{0}'")]
    DuplicateType(String),
    /// A module type cannot be used as a URL segment or clashes with a
    /// reserved name.
    #[error(
        "Invalid page module type '{0}': must be a non-empty slug other than '{MULTI_MODE}' or '{PAGE_NODE_TYPE}'"
    )]
    InvalidType(String),
    /// A module declares an empty display name.
    #[error("Page module '{0}' has an empty display name")]
    EmptyDisplayName(String),
}

/// Immutable set of page modules, in registration order.
pub struct PageRegistry {
    modules: Vec<Arc<dyn PageModule>>,
    index: HashMap<String, usize>,
}

impl PageRegistry {
    /// Build a registry from a registration list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] if two modules share a type,
    /// [`RegistryError::InvalidType`] if a type is not a usable slug, or
    /// [`RegistryError::EmptyDisplayName`] for a blank navigation title.
    pub fn from_modules<I>(modules: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn PageModule>>,
    {
        let mut registry = Self {
            modules: Vec::new(),
            index: HashMap::new(),
        };

        for module in modules {
            let page_type = module.page_type().to_owned();
            if page_type.is_empty()
                || slugify(&page_type) != page_type
                || page_type == MULTI_MODE
                || page_type == PAGE_NODE_TYPE
            {
                return Err(RegistryError::InvalidType(page_type));
            }
            if module.display_name().is_some_and(str::is_empty) {
                return Err(RegistryError::EmptyDisplayName(page_type));
            }
            if registry.index.contains_key(&page_type) {
                return Err(RegistryError::DuplicateType(page_type));
            }

            tracing::debug!(
                page_type = %page_type,
                active = module.display_name().is_some(),
                "Registered page module"
            );
            registry.index.insert(page_type, registry.modules.len());
            registry.modules.push(module);
        }

        Ok(registry)
    }

    /// Every module, active or not, in registration order.
    pub fn all_modules(&self) -> &[Arc<dyn PageModule>] {
        &self.modules
    }

    /// Look up a module by type.
    pub fn get(&self, page_type: &str) -> Option<&Arc<dyn PageModule>> {
        self.index.get(page_type).map(|&idx| &self.modules[idx])
    }

    /// Modules with a display name, in registration order.
    pub fn active_modules(&self) -> impl Iterator<Item = &Arc<dyn PageModule>> {
        self.modules
            .iter()
            .filter(|module| module.display_name().is_some())
    }

    /// Extra templates of every module, deduplicated, in first-seen order.
    pub fn template_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for name in self.modules.iter().flat_map(|module| module.templates()) {
            if !names.contains(name) {
                names.push(name);
            }
        }
        names
    }

    /// Resolve a configured site mode.
    ///
    /// Returns `None` unless `value` is `multi` or a registered type.
    pub fn site_mode(&self, value: &str) -> Option<SiteMode> {
        if value == MULTI_MODE {
            Some(SiteMode::Multi)
        } else if self.index.contains_key(value) {
            Some(SiteMode::Single(value.to_owned()))
        } else {
            None
        }
    }

    /// Run every module's card hook on `page`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure; later hooks do not run.
    pub async fn process_card(&self, page: &mut CardPage) -> Result<(), ModuleError> {
        for module in &self.modules {
            module.process_card(page).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use husky_trello::Card;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::module::RouteTable;

    static_assertions::assert_impl_all!(PageRegistry: Send, Sync);

    struct TestModule {
        page_type: &'static str,
        name: Option<&'static str>,
        templates: &'static [&'static str],
    }

    #[async_trait]
    impl PageModule for TestModule {
        fn page_type(&self) -> &str {
            self.page_type
        }

        fn display_name(&self) -> Option<&str> {
            self.name
        }

        fn routes(&self) -> RouteTable {
            RouteTable::new()
        }

        fn templates(&self) -> &'static [&'static str] {
            self.templates
        }

        async fn process_card(&self, page: &mut CardPage) -> Result<(), ModuleError> {
            let seen = page
                .extra
                .entry("seen")
                .or_insert_with(|| serde_json::json!([]));
            if let Some(seen) = seen.as_array_mut() {
                seen.push(self.page_type.into());
            }
            Ok(())
        }
    }

    fn module(
        page_type: &'static str,
        name: Option<&'static str>,
        templates: &'static [&'static str],
    ) -> Arc<dyn PageModule> {
        Arc::new(TestModule {
            page_type,
            name,
            templates,
        })
    }

    #[test]
    fn test_empty_registry() {
        let registry = PageRegistry::from_modules(Vec::new()).unwrap();

        assert!(registry.all_modules().is_empty());
        assert_eq!(registry.active_modules().count(), 0);
        assert!(registry.template_names().is_empty());
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let result = PageRegistry::from_modules(vec![
            module("blog", Some("Blog"), &[]),
            module("blog", Some("Other Blog"), &[]),
        ]);

        let err = result.err().unwrap();
        assert!(matches!(err, RegistryError::DuplicateType(ref t) if t == "blog"));
        assert_eq!(err.to_string(), "Duplicate page module type 'blog'");
    }

    #[test]
    fn test_invalid_types_are_rejected() {
        for bad in ["", "Blog", "my blog", "multi", "page"] {
            let result = PageRegistry::from_modules(vec![module(bad, None, &[])]);
            assert!(
                matches!(result, Err(RegistryError::InvalidType(_))),
                "type {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_display_name_is_rejected() {
        let result = PageRegistry::from_modules(vec![module("blog", Some(""), &[])]);

        assert!(matches!(result, Err(RegistryError::EmptyDisplayName(ref t)) if t == "blog"));
    }

    #[test]
    fn test_active_modules_keep_registration_order() {
        let registry = PageRegistry::from_modules(vec![
            module("timeline", Some("Timeline"), &[]),
            module("hidden", None, &[]),
            module("blog", Some("Blog"), &[]),
        ])
        .unwrap();

        let active: Vec<&str> = registry.active_modules().map(|m| m.page_type()).collect();
        assert_eq!(active, ["timeline", "blog"]);
        assert_eq!(registry.all_modules().len(), 3);
        assert!(registry.get("hidden").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_template_names_are_deduplicated() {
        let registry = PageRegistry::from_modules(vec![
            module("blog", Some("Blog"), &["blog", "blog_post"]),
            module("news", None, &["blog_post", "news"]),
        ])
        .unwrap();

        assert_eq!(registry.template_names(), ["blog", "blog_post", "news"]);
    }

    #[test]
    fn test_site_mode() {
        let registry = PageRegistry::from_modules(vec![
            module("blog", Some("Blog"), &[]),
            module("timeline", None, &[]),
        ])
        .unwrap();

        assert_eq!(registry.site_mode("multi"), Some(SiteMode::Multi));
        assert_eq!(
            registry.site_mode("blog"),
            Some(SiteMode::Single("blog".to_owned()))
        );
        // Inactive modules can still be served alone
        assert_eq!(
            registry.site_mode("timeline"),
            Some(SiteMode::Single("timeline".to_owned()))
        );
        assert_eq!(registry.site_mode("shop"), None);
        assert_eq!(registry.site_mode(""), None);
    }

    #[test]
    fn test_site_mode_display_and_serialize() {
        let mode = SiteMode::Single("blog".to_owned());

        assert_eq!(mode.to_string(), "blog");
        assert_eq!(serde_json::to_value(&mode).unwrap(), "blog");
        assert_eq!(serde_json::to_value(SiteMode::Multi).unwrap(), "multi");
        assert!(SiteMode::Multi.is_multi());
        assert!(!mode.is_multi());
    }

    #[tokio::test]
    async fn test_process_card_runs_every_hook_in_order() {
        let registry = PageRegistry::from_modules(vec![
            module("blog", Some("Blog"), &[]),
            module("timeline", None, &[]),
        ])
        .unwrap();
        let mut page = CardPage::from_card(&Card::default());

        registry.process_card(&mut page).await.unwrap();

        assert_eq!(page.extra["seen"], serde_json::json!(["blog", "timeline"]));
    }
}
