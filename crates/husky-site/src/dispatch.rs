//! Request path resolution.
//!
//! The [`Dispatcher`] is built once from the registry and the site mode. It
//! holds an ordered list of mounted patterns and resolves a request path to
//! the first one that matches.

use std::sync::Arc;

use husky_trello::Card;

use crate::module::{PageModule, RouteHandler, RouteParams};
use crate::registry::{PageRegistry, SiteMode};
use crate::slug::slugify;

/// Slug served at the site root in multi mode.
pub const HOME_SLUG: &str = "home";

/// Outcome of resolving a request path.
pub enum Resolution {
    /// A page module route matched.
    Module {
        /// Module owning the route.
        module: Arc<dyn PageModule>,
        /// Route handler.
        handler: Arc<dyn RouteHandler>,
        /// Captured path parameters.
        params: RouteParams,
    },
    /// A generic card page route matched.
    Page {
        /// Requested page slug.
        slug: String,
    },
    /// Nothing matched.
    NotFound,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module { module, params, .. } => f
                .debug_struct("Module")
                .field("module", &module.page_type())
                .field("params", params)
                .finish_non_exhaustive(),
            Self::Page { slug } => f.debug_struct("Page").field("slug", slug).finish(),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parsed mount path.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RoutePattern {
    path: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    fn parse(path: &str) -> Self {
        let segments = split_path(path)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) => Segment::Param(name.to_owned()),
                    None => Segment::Literal(segment.to_owned()),
                }
            })
            .collect();

        Self {
            path: path.to_owned(),
            segments,
        }
    }

    fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal.eq_ignore_ascii_case(part) => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_owned());
                }
            }
        }
        Some(params)
    }
}

/// Split a path into non-empty segments, ignoring leading, trailing and
/// repeated slashes.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

enum Target {
    Module {
        module: Arc<dyn PageModule>,
        handler: Arc<dyn RouteHandler>,
    },
    Home,
    Page,
}

struct Mount {
    pattern: RoutePattern,
    target: Target,
}

/// Resolves request paths to module routes or card pages.
pub struct Dispatcher {
    mounts: Vec<Mount>,
}

impl Dispatcher {
    /// Mount the routes for `mode`.
    ///
    /// Multi mode mounts every active module's routes, relative ones under
    /// `/{type}`, followed by the card page routes `/` and `/{page}`. Single
    /// mode mounts only the served module's routes, relative ones at the
    /// root.
    #[must_use]
    pub fn new(registry: &PageRegistry, mode: &SiteMode) -> Self {
        let mut mounts = Vec::new();

        match mode {
            SiteMode::Multi => {
                for module in registry.active_modules() {
                    mount_module(&mut mounts, module, Some(module.page_type()));
                }
                mounts.push(Mount {
                    pattern: RoutePattern::parse("/"),
                    target: Target::Home,
                });
                mounts.push(Mount {
                    pattern: RoutePattern::parse("/{page}"),
                    target: Target::Page,
                });
            }
            SiteMode::Single(page_type) => {
                if let Some(module) = registry.get(page_type) {
                    mount_module(&mut mounts, module, None);
                }
            }
        }

        Self { mounts }
    }

    /// Resolve a request path. The first mounted pattern that matches wins.
    pub fn resolve(&self, path: &str) -> Resolution {
        for mount in &self.mounts {
            let Some(params) = mount.pattern.matches(path) else {
                continue;
            };
            return match &mount.target {
                Target::Module { module, handler } => Resolution::Module {
                    module: Arc::clone(module),
                    handler: Arc::clone(handler),
                    params,
                },
                Target::Home => Resolution::Page {
                    slug: HOME_SLUG.to_owned(),
                },
                Target::Page => Resolution::Page {
                    slug: params.get("page").cloned().unwrap_or_default(),
                },
            };
        }
        Resolution::NotFound
    }

    /// Mounted path patterns, in match order.
    pub fn mounted_paths(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|mount| mount.pattern.path.as_str())
    }
}

fn mount_module(mounts: &mut Vec<Mount>, module: &Arc<dyn PageModule>, namespace: Option<&str>) {
    for (route, handler) in module.routes() {
        let path = route.mount_path(namespace);
        tracing::debug!(page_type = module.page_type(), %path, "Mounted module route");
        mounts.push(Mount {
            pattern: RoutePattern::parse(&path),
            target: Target::Module {
                module: Arc::clone(module),
                handler,
            },
        });
    }
}

/// Find the first card whose slugified name equals `slug`.
pub fn find_page<'a>(cards: &'a [Card], slug: &str) -> Option<&'a Card> {
    cards.iter().find(|card| slugify(&card.name) == slug)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::module::{ModuleError, ModuleResponse, PageContext, Route, RouteTable};

    struct Tag(&'static str);

    #[async_trait]
    impl RouteHandler for Tag {
        async fn call(&self, _ctx: &PageContext<'_>) -> Result<ModuleResponse, ModuleError> {
            Ok(ModuleResponse::Json(self.0.into()))
        }
    }

    struct TestModule {
        page_type: &'static str,
        name: Option<&'static str>,
        routes: fn() -> RouteTable,
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
            (self.routes)()
        }
    }

    fn blog_routes() -> RouteTable {
        RouteTable::new()
            .route(Route::relative(""), Tag("index"))
            .route(Route::relative("{post}"), Tag("post"))
            .route(Route::absolute("/about-us"), Tag("shadow"))
    }

    fn timeline_routes() -> RouteTable {
        RouteTable::new().route(Route::relative(""), Tag("timeline"))
    }

    fn registry() -> PageRegistry {
        PageRegistry::from_modules(vec![
            Arc::new(TestModule {
                page_type: "blog",
                name: Some("Blog"),
                routes: blog_routes,
            }) as Arc<dyn PageModule>,
            Arc::new(TestModule {
                page_type: "timeline",
                name: None,
                routes: timeline_routes,
            }),
        ])
        .unwrap()
    }

    fn module_of(resolution: &Resolution) -> Option<(&str, &RouteParams)> {
        match resolution {
            Resolution::Module { module, params, .. } => Some((module.page_type(), params)),
            _ => None,
        }
    }

    fn page_of(resolution: &Resolution) -> Option<&str> {
        match resolution {
            Resolution::Page { slug } => Some(slug),
            _ => None,
        }
    }

    #[test]
    fn test_pattern_matching() {
        let pattern = RoutePattern::parse("/blog/{post}");

        let params = pattern.matches("/blog/first-post").unwrap();
        assert_eq!(params.get("post").map(String::as_str), Some("first-post"));
        assert!(pattern.matches("/blog").is_none());
        assert!(pattern.matches("/blog/a/b").is_none());
        assert!(pattern.matches("/news/first-post").is_none());
    }

    #[test]
    fn test_pattern_ignores_trailing_slash() {
        let pattern = RoutePattern::parse("/blog/");

        assert!(pattern.matches("/blog").is_some());
        assert!(pattern.matches("/blog/").is_some());
        assert!(RoutePattern::parse("/").matches("/").is_some());
    }

    #[test]
    fn test_pattern_literals_ignore_case() {
        let pattern = RoutePattern::parse("/blog/{post}");

        let params = pattern.matches("/Blog/First-Post").unwrap();
        assert_eq!(params.get("post").map(String::as_str), Some("First-Post"));
        assert!(RoutePattern::parse("/blog/").matches("/BLOG").is_some());
    }

    #[test]
    fn test_multi_mode_mounts() {
        let dispatcher = Dispatcher::new(&registry(), &SiteMode::Multi);

        let paths: Vec<&str> = dispatcher.mounted_paths().collect();
        assert_eq!(paths, ["/blog/", "/blog/{post}", "/about-us", "/", "/{page}"]);
    }

    #[test]
    fn test_multi_mode_resolution() {
        let dispatcher = Dispatcher::new(&registry(), &SiteMode::Multi);

        assert_eq!(module_of(&dispatcher.resolve("/blog")).unwrap().0, "blog");
        let resolution = dispatcher.resolve("/blog/hello");
        let (page_type, params) = module_of(&resolution).unwrap();
        assert_eq!(page_type, "blog");
        assert_eq!(params.get("post").map(String::as_str), Some("hello"));

        assert_eq!(page_of(&dispatcher.resolve("/")), Some("home"));
        assert_eq!(page_of(&dispatcher.resolve("/contact")), Some("contact"));
        assert!(matches!(dispatcher.resolve("/a/b/c"), Resolution::NotFound));
    }

    #[test]
    fn test_inactive_module_is_not_mounted_in_multi_mode() {
        let dispatcher = Dispatcher::new(&registry(), &SiteMode::Multi);

        // Falls through to the card page route
        assert_eq!(page_of(&dispatcher.resolve("/timeline")), Some("timeline"));
    }

    #[test]
    fn test_module_route_shadows_card_page() {
        let dispatcher = Dispatcher::new(&registry(), &SiteMode::Multi);

        assert_eq!(
            module_of(&dispatcher.resolve("/about-us")).unwrap().0,
            "blog"
        );
    }

    #[test]
    fn test_single_mode_mounts_at_root() {
        let mode = SiteMode::Single("blog".to_owned());
        let dispatcher = Dispatcher::new(&registry(), &mode);

        let paths: Vec<&str> = dispatcher.mounted_paths().collect();
        assert_eq!(paths, ["/", "/{post}", "/about-us"]);
        assert_eq!(module_of(&dispatcher.resolve("/")).unwrap().0, "blog");
        assert!(matches!(dispatcher.resolve("/a/b"), Resolution::NotFound));
    }

    #[test]
    fn test_single_mode_serves_inactive_module() {
        let mode = SiteMode::Single("timeline".to_owned());
        let dispatcher = Dispatcher::new(&registry(), &mode);

        assert_eq!(
            module_of(&dispatcher.resolve("/")).unwrap().0,
            "timeline"
        );
        assert!(matches!(dispatcher.resolve("/about-us"), Resolution::NotFound));
    }

    #[test]
    fn test_find_page() {
        let cards = [
            Card {
                id: "1".to_owned(),
                name: "About Us".to_owned(),
                ..Card::default()
            },
            Card {
                id: "2".to_owned(),
                name: "about us".to_owned(),
                ..Card::default()
            },
        ];

        assert_eq!(find_page(&cards, "about-us").map(|c| c.id.as_str()), Some("1"));
        assert!(find_page(&cards, "unknown-slug").is_none());
        assert!(find_page(&[], "home").is_none());
    }
}
