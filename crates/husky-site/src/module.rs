//! Page module contract.
//!
//! A page module is a self-contained part of the site with its own routes,
//! for example a blog. Modules are registered at startup with
//! [`PageRegistry`](crate::PageRegistry) and never change afterwards.
//!
//! Route tables map a [`Route`] to a [`RouteHandler`]. Relative routes are
//! mounted under the module's type (`/blog/...` in multi mode), absolute
//! routes claim a site-wide path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use husky_trello::{Card, ContentClient, ContentFetchError};

use crate::page::CardPage;
use crate::registry::SiteMode;
use crate::site_tree::SiteTreeNode;

/// Named path parameters captured by a route pattern.
pub type RouteParams = HashMap<String, String>;

/// A route key in a module's route table.
///
/// Patterns are `/`-separated segments; a `{name}` segment captures one
/// path segment into [`RouteParams`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Path relative to the module's namespace (`""` is the module root).
    Relative(String),
    /// Site-wide path, mounted as given.
    Absolute(String),
}

impl Route {
    /// Create a route relative to the module's namespace.
    pub fn relative(path: impl Into<String>) -> Self {
        Self::Relative(path.into())
    }

    /// Create a site-wide route.
    pub fn absolute(path: impl Into<String>) -> Self {
        Self::Absolute(path.into())
    }

    /// Concrete path this route is mounted at.
    ///
    /// `namespace` is the module type in multi mode and `None` when the
    /// module is the only one being served.
    pub(crate) fn mount_path(&self, namespace: Option<&str>) -> String {
        match (self, namespace) {
            (Self::Relative(path), Some(namespace)) => format!("/{namespace}/{path}"),
            (Self::Relative(path), None) => format!("/{path}"),
            (Self::Absolute(path), _) => path.clone(),
        }
    }
}

/// What a route handler asks the server to send back.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleResponse {
    /// Render `template` inside the site layout.
    Render {
        /// Template name.
        template: String,
        /// Page title.
        title: String,
        /// Template data, merged over the base context.
        data: serde_json::Value,
    },
    /// Send a JSON body.
    Json(serde_json::Value),
    /// Render the not-found page.
    NotFound,
}

impl ModuleResponse {
    /// Shorthand for [`ModuleResponse::Render`].
    pub fn render(
        template: impl Into<String>,
        title: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::Render {
            template: template.into(),
            title: title.into(),
            data,
        }
    }
}

/// Failure inside a page module.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Fetching the module's content failed.
    #[error(transparent)]
    Content(#[from] ContentFetchError),
    /// Any other handler failure.
    #[error("{0}")]
    Failed(String),
}

/// Per-request data available to route handlers.
pub struct PageContext<'a> {
    /// Parameters captured from the request path.
    pub params: &'a RouteParams,
    /// Cards of the configured page list.
    pub pages: &'a [Card],
    /// Navigation tree for this request.
    pub sitetree: &'a [SiteTreeNode],
    /// Cached content client.
    pub content: &'a ContentClient,
    /// Whether the request asked to bypass the content cache.
    pub skip_cache: bool,
    /// Active site mode.
    pub site_mode: &'a SiteMode,
}

impl PageContext<'_> {
    /// Get a captured path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Handler for one route of a page module.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Handle a matched `GET` request.
    async fn call(&self, ctx: &PageContext<'_>) -> Result<ModuleResponse, ModuleError>;
}

/// Ordered mapping from routes to handlers.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Vec<(Route, Arc<dyn RouteHandler>)>,
}

impl RouteTable {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Earlier routes take precedence over later ones.
    #[must_use]
    pub fn route(mut self, route: Route, handler: impl RouteHandler + 'static) -> Self {
        self.entries.push((route, Arc::new(handler)));
        self
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RouteTable {
    type Item = (Route, Arc<dyn RouteHandler>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A registered page module.
#[async_trait]
pub trait PageModule: Send + Sync {
    /// Unique short identifier, also the URL namespace and the site mode
    /// value that serves this module alone.
    fn page_type(&self) -> &str;

    /// Navigation title. `None` keeps the module out of navigation (and out
    /// of multi mode routing).
    fn display_name(&self) -> Option<&str>;

    /// The module's route table.
    fn routes(&self) -> RouteTable;

    /// Extra templates the module renders.
    fn templates(&self) -> &'static [&'static str] {
        &[]
    }

    /// Enrich a card page before it is rendered as a generic page.
    async fn process_card(&self, _page: &mut CardPage) -> Result<(), ModuleError> {
        Ok(())
    }
}
