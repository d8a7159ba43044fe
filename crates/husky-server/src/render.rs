//! HTML rendering with tera templates.
//!
//! Templates live in one directory as `{name}.html`. A page is rendered in
//! two passes: the named template first, then `layout` with the result
//! available as `page`.

use std::path::Path;

use husky_site::SiteTreeNode;
use serde::Serialize;
use tera::{Context, Tera};

/// Template wrapping every rendered page.
pub(crate) const LAYOUT_TEMPLATE: &str = "layout";
/// Template for generic card pages.
pub(crate) const PAGE_TEMPLATE: &str = "page";
/// Template for unmatched requests.
pub(crate) const NOT_FOUND_TEMPLATE: &str = "not_found";

/// Templates every site needs, before module templates.
pub(crate) const CORE_TEMPLATES: [&str; 3] = [LAYOUT_TEMPLATE, PAGE_TEMPLATE, NOT_FOUND_TEMPLATE];

/// Template loading or rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template parse or render error.
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    /// Required templates are absent.
    #[error("Missing templates: {}", .0.join(", "))]
    MissingTemplates(Vec<String>),
}

/// Values present in every template context.
#[derive(Clone, Debug, Default, Serialize)]
pub(crate) struct BaseContext {
    pub(crate) sitename: String,
    pub(crate) ownername: Option<String>,
    pub(crate) ownerlink: Option<String>,
    pub(crate) sitetree: Vec<SiteTreeNode>,
    pub(crate) custom_css: Option<String>,
    pub(crate) custom_js: Option<String>,
    pub(crate) custom_brand: Option<String>,
    pub(crate) custom_timeline_marker: Option<String>,
}

/// Loaded template set.
pub(crate) struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load every `*.html` template under `dir` and check that `required`
    /// are present.
    pub(crate) fn from_dir(dir: &Path, required: &[&str]) -> Result<Self, RenderError> {
        let glob = dir.join("**").join("*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;
        tracing::debug!(
            dir = %dir.display(),
            count = tera.get_template_names().count(),
            "Loaded templates"
        );
        Self::checked(tera, required)
    }

    /// Build from in-memory `(name, source)` pairs.
    #[cfg(test)]
    pub(crate) fn from_sources(
        sources: &[(&str, &str)],
        required: &[&str],
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, source)| (format!("{name}.html"), *source)),
        )?;
        Self::checked(tera, required)
    }

    fn checked(tera: Tera, required: &[&str]) -> Result<Self, RenderError> {
        let missing: Vec<String> = required
            .iter()
            .map(|name| format!("{name}.html"))
            .filter(|file| !tera.get_template_names().any(|loaded| loaded == file.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(RenderError::MissingTemplates(missing));
        }
        Ok(Self { tera })
    }

    /// Render `template` with `data` over the base context, wrapped in the
    /// layout.
    ///
    /// Object `data` is merged key by key; any other value is exposed as
    /// `data`.
    pub(crate) fn render(
        &self,
        template: &str,
        title: &str,
        data: &serde_json::Value,
        base: &BaseContext,
    ) -> Result<String, RenderError> {
        let mut context = Context::from_serialize(base)?;
        context.insert("title", title);

        let mut page_context = context.clone();
        match data {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    page_context.insert(key.as_str(), value);
                }
            }
            serde_json::Value::Null => {}
            other => page_context.insert("data", other),
        }

        let page = self
            .tera
            .render(&format!("{template}.html"), &page_context)?;
        context.insert("page", &page);
        Ok(self
            .tera
            .render(&format!("{LAYOUT_TEMPLATE}.html"), &context)?)
    }
}
