//! Site structure for Husky.
//!
//! This crate turns card lists and page modules into a navigable site:
//! - [`PageModule`]: contract for pluggable sections with their own routes
//! - [`PageRegistry`]: immutable set of modules, and site mode selection
//! - [`build_site_tree`]: navigation from active modules and page cards
//! - [`Dispatcher`]: request path to module route or card page
//!
//! Nothing here touches HTTP; the server crate feeds request paths in and
//! renders what comes back.

mod dispatch;
mod module;
pub mod modules;
mod page;
mod registry;
mod site_tree;
mod slug;

pub use dispatch::{Dispatcher, HOME_SLUG, Resolution, find_page};
pub use module::{
    ModuleError, ModuleResponse, PageContext, PageModule, Route, RouteHandler, RouteParams,
    RouteTable,
};
pub use page::{CardPage, render_markdown};
pub use registry::{MULTI_MODE, PageRegistry, RegistryError, SiteMode};
pub use site_tree::{PAGE_NODE_TYPE, SiteTreeNode, build_site_tree};
pub use slug::slugify;
