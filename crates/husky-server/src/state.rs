//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use husky_config::Config;
use husky_site::modules::{self, ModuleSettings};
use husky_site::{Dispatcher, MULTI_MODE, PageRegistry, SiteMode, SiteTreeNode};
use husky_trello::{CardSource, ContentClient};

use crate::error::StartupError;
use crate::render::{BaseContext, CORE_TEMPLATES, Renderer};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Registered page modules.
    pub(crate) registry: PageRegistry,
    /// Serving mode.
    pub(crate) mode: SiteMode,
    /// Route resolution for `mode`.
    pub(crate) dispatcher: Dispatcher,
    /// Cached card fetching.
    pub(crate) content: ContentClient,
    /// Loaded templates.
    pub(crate) renderer: Renderer,
    /// List holding generic pages.
    pub(crate) page_list: Option<String>,
    /// Base template values, without the site tree.
    pub(crate) site: BaseContext,
}

impl AppState {
    /// Build state from configuration, loading templates from disk.
    pub(crate) fn new(config: &Config, source: Arc<dyn CardSource>) -> Result<Self, StartupError> {
        let (registry, mode) = load_registry(config)?;
        let mut required: Vec<&str> = CORE_TEMPLATES.to_vec();
        required.extend(registry.template_names());
        let renderer = Renderer::from_dir(&config.paths.templates_dir, &required)?;
        Ok(Self::with_renderer(config, source, registry, mode, renderer))
    }

    /// Assemble state around an already loaded renderer.
    pub(crate) fn with_renderer(
        config: &Config,
        source: Arc<dyn CardSource>,
        registry: PageRegistry,
        mode: SiteMode,
        renderer: Renderer,
    ) -> Self {
        let content = if config.dev_mode {
            tracing::info!("Development mode: card cache disabled");
            ContentClient::volatile(source)
        } else {
            ContentClient::new(source)
        };
        let dispatcher = Dispatcher::new(&registry, &mode);
        let site = &config.site;

        Self {
            registry,
            mode,
            dispatcher,
            content,
            renderer,
            page_list: site.page_list.clone(),
            site: BaseContext {
                sitename: site.name.clone(),
                ownername: site.owner_name.clone(),
                ownerlink: site.owner_link.clone(),
                sitetree: Vec::new(),
                custom_css: site.custom.css.clone(),
                custom_js: site.custom.js.clone(),
                custom_brand: site.custom.brand.clone(),
                custom_timeline_marker: site.custom.timeline_marker.clone(),
            },
        }
    }

    /// Base context for one request.
    pub(crate) fn base_context(&self, sitetree: Vec<SiteTreeNode>) -> BaseContext {
        BaseContext {
            sitetree,
            ..self.site.clone()
        }
    }
}

/// Register the built-in modules and resolve the configured site mode.
pub(crate) fn load_registry(config: &Config) -> Result<(PageRegistry, SiteMode), StartupError> {
    let settings = ModuleSettings {
        blog_list: config.modules.blog_list.clone(),
        timeline_list: config.modules.timeline_list.clone(),
    };
    let registry = PageRegistry::from_modules(modules::builtin(&settings))?;

    let Some(mode) = registry.site_mode(&config.site.mode) else {
        let available = std::iter::once(MULTI_MODE)
            .chain(registry.all_modules().iter().map(|m| m.page_type()))
            .map(str::to_owned)
            .collect();
        return Err(StartupError::InvalidSiteMode {
            mode: config.site.mode.clone(),
            available,
        });
    };

    Ok((registry, mode))
}
