//! HTTP server for Husky.
//!
//! This crate wires the site crates into an axum server:
//! - every site route goes through one fallback handler that resolves the
//!   path with the [`Dispatcher`](husky_site::Dispatcher)
//! - pages are rendered with tera templates wrapped in a shared layout
//! - `/dist` and `/static` are served from disk
//!
//! # Quick Start
//!
//! ```ignore
//! use husky_config::Config;
//! use husky_server::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     run_server(&config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (husky-server)
//!                        │
//!                        ├─► /dist, /static (tower-http ServeDir)
//!                        │
//!                        └─► fallback ──► Dispatcher
//!                                 │
//!                                 ├─► page module route handler
//!                                 └─► card page ──► module hooks
//!                                          │
//!                                          └─► ContentClient ──► Trello
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod render;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use husky_config::Config;
use husky_trello::{CardSource, TrelloClient};
use state::AppState;

pub use error::StartupError;
pub use render::RenderError;

/// What a configuration resolves to, without starting the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSummary {
    /// Resolved site mode.
    pub mode: String,
    /// Types of modules shown in navigation.
    pub active_modules: Vec<String>,
    /// Mounted route patterns, in match order.
    pub routes: Vec<String>,
}

/// Validate a configuration the way server startup does.
///
/// Registers the page modules, resolves the site mode and loads every
/// required template. No request is made to the card provider.
///
/// # Errors
///
/// Returns the first startup failure.
pub fn check_site(config: &Config) -> Result<SiteSummary, StartupError> {
    let state = AppState::new(config, trello_source(config))?;
    Ok(SiteSummary {
        mode: state.mode.to_string(),
        active_modules: state
            .registry
            .active_modules()
            .map(|module| module.page_type().to_owned())
            .collect(),
        routes: state
            .dispatcher
            .mounted_paths()
            .map(str::to_owned)
            .collect(),
    })
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Site configuration
///
/// # Errors
///
/// Returns an error if the site cannot be built or the server fails to
/// start.
pub async fn run_server(config: &Config) -> Result<(), StartupError> {
    let state = Arc::new(AppState::new(config, trello_source(config))?);
    tracing::info!(mode = %state.mode, site = %config.site.name, "Site loaded");

    let app = app::create_router(state, &config.paths);

    let addr_str = format!("{}:{}", config.server.host, config.server.port);
    let addr = SocketAddr::from_str(&addr_str).map_err(|_| StartupError::Address(addr_str))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn trello_source(config: &Config) -> Arc<dyn CardSource> {
    Arc::new(TrelloClient::new(
        &config.trello.base_url,
        &config.trello.app_key,
        &config.trello.token,
    ))
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
