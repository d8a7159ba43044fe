//! Router construction.
//!
//! Builds the axum router with asset routes, the site fallback and
//! middleware.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::Response;
use husky_config::PathsConfig;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::error_response;
use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `paths` - Asset directories served under `/dist` and `/static`
pub(crate) fn create_router(state: Arc<AppState>, paths: &PathsConfig) -> Router {
    Router::new()
        .nest_service("/dist", ServeDir::new(&paths.dist_dir))
        .nest_service("/static", ServeDir::new(&paths.static_dir))
        .fallback(handlers::dispatch::handle)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

/// Turn a handler panic into the standard 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("Internal server error");
    tracing::error!(panic = detail, "Request handler panicked");
    error_response(detail)
}
