//! Site request handler.
//!
//! Every non-asset request lands here. The handler loads the page list,
//! builds the navigation tree and lets the dispatcher pick a module route
//! or a card page.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use husky_site::{
    CardPage, ModuleResponse, PageContext, Resolution, SiteTreeNode, build_site_tree, find_page,
};
use serde_json::json;

use crate::error::{ServerError, error_response};
use crate::render::{NOT_FOUND_TEMPLATE, PAGE_TEMPLATE};
use crate::state::AppState;

/// Query flag forcing a refetch of every list the request touches.
const NOCACHE_PARAM: &str = "nocache";
/// Query flag pretty-printing JSON responses.
const PRETTY_PARAM: &str = "pretty";

/// Handle any request not served by the asset routes.
pub(crate) async fn handle(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ServerError> {
    if method != Method::GET && method != Method::HEAD {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let skip_cache = query.contains_key(NOCACHE_PARAM);
    let pretty = query.contains_key(PRETTY_PARAM);

    let pages = match &state.page_list {
        Some(list_id) => state.content.fetch_cards(list_id, skip_cache).await?,
        None => Arc::from(Vec::new()),
    };
    let sitetree = build_site_tree(&pages, &state.registry, &state.mode);

    let resolution = state.dispatcher.resolve(uri.path());
    tracing::debug!(path = uri.path(), ?resolution, "Resolved request");

    let response = match resolution {
        Resolution::Module {
            handler, params, ..
        } => {
            let ctx = PageContext {
                params: &params,
                pages: &pages,
                sitetree: &sitetree,
                content: &state.content,
                skip_cache,
                site_mode: &state.mode,
            };
            handler.call(&ctx).await?
        }
        Resolution::Page { slug } => match find_page(&pages, &slug) {
            Some(card) => {
                let mut page = CardPage::from_card(card);
                state.registry.process_card(&mut page).await?;
                ModuleResponse::render(
                    PAGE_TEMPLATE,
                    card.name.as_str(),
                    json!({ "page": page }),
                )
            }
            None => ModuleResponse::NotFound,
        },
        Resolution::NotFound => ModuleResponse::NotFound,
    };

    respond(&state, response, sitetree, pretty)
}

fn respond(
    state: &AppState,
    response: ModuleResponse,
    sitetree: Vec<SiteTreeNode>,
    pretty: bool,
) -> Result<Response, ServerError> {
    let base = state.base_context(sitetree);
    match response {
        ModuleResponse::Render {
            template,
            title,
            data,
        } => {
            let html = state.renderer.render(&template, &title, &data, &base)?;
            Ok(Html(html).into_response())
        }
        ModuleResponse::Json(value) => Ok(json_response(&value, pretty)),
        ModuleResponse::NotFound => {
            let html = state.renderer.render(
                NOT_FOUND_TEMPLATE,
                "Not Found",
                &serde_json::Value::Null,
                &base,
            )?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
    }
}

/// Serialize a JSON body, indented when `pretty` is set.
fn json_response(value: &serde_json::Value, pretty: bool) -> Response {
    let body = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match body {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => error_response(&e.to_string()),
    }
}
