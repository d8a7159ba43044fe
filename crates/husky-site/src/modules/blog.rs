//! Blog module: a list of posts, one card per post.

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde_json::json;

use super::load_pages;
use crate::module::{
    ModuleError, ModuleResponse, PageContext, PageModule, Route, RouteHandler, RouteTable,
};
use crate::page::CardPage;

const EXCERPT_CHARS: usize = 200;

/// Blog backed by one card list.
pub struct BlogModule {
    list_id: Option<String>,
}

impl BlogModule {
    /// Create the module. It is active when `list_id` is set.
    #[must_use]
    pub fn new(list_id: Option<String>) -> Self {
        Self { list_id }
    }

    fn list_id(&self) -> String {
        self.list_id.clone().unwrap_or_default()
    }
}

#[async_trait]
impl PageModule for BlogModule {
    fn page_type(&self) -> &str {
        "blog"
    }

    fn display_name(&self) -> Option<&str> {
        self.list_id.as_ref().map(|_| "Blog")
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .route(
                Route::relative(""),
                BlogIndex {
                    list_id: self.list_id(),
                },
            )
            .route(
                Route::relative("{post}"),
                BlogPost {
                    list_id: self.list_id(),
                },
            )
    }

    fn templates(&self) -> &'static [&'static str] {
        &["blog", "blog_post"]
    }

    async fn process_card(&self, page: &mut CardPage) -> Result<(), ModuleError> {
        add_excerpt(page);
        Ok(())
    }
}

struct BlogIndex {
    list_id: String,
}

#[async_trait]
impl RouteHandler for BlogIndex {
    async fn call(&self, ctx: &PageContext<'_>) -> Result<ModuleResponse, ModuleError> {
        let mut posts = load_pages(ctx, &self.list_id).await?;
        posts.iter_mut().for_each(add_excerpt);

        // Post links are relative to the index
        let base = if ctx.site_mode.is_multi() {
            "/blog/"
        } else {
            "/"
        };
        Ok(ModuleResponse::render(
            "blog",
            "Blog",
            json!({ "posts": posts, "base": base }),
        ))
    }
}

struct BlogPost {
    list_id: String,
}

#[async_trait]
impl RouteHandler for BlogPost {
    async fn call(&self, ctx: &PageContext<'_>) -> Result<ModuleResponse, ModuleError> {
        let Some(slug) = ctx.param("post") else {
            return Ok(ModuleResponse::NotFound);
        };

        let posts = load_pages(ctx, &self.list_id).await?;
        let Some(post) = posts.into_iter().find(|post| post.slug == slug) else {
            return Ok(ModuleResponse::NotFound);
        };

        let title = post.card.name.clone();
        Ok(ModuleResponse::render(
            "blog_post",
            title,
            json!({ "post": post }),
        ))
    }
}

fn add_excerpt(page: &mut CardPage) {
    let excerpt = excerpt(&page.card.description, EXCERPT_CHARS);
    page.extra.insert("excerpt".to_owned(), excerpt.into());
}

/// Plain text of the first paragraph, cut at a word boundary.
fn excerpt(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => break,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}
