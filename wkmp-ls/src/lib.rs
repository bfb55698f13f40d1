//! wkmp-ls library - Library Search module
//!
//! Tiered song search over the shared wkmp catalog: prefix (or phrase),
//! then substring, then typo-tolerant fuzzy matching, with results
//! deduplicated and ranked by a composite score.

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod search;

use index::CatalogIndex;
use search::{SearchConfig, SearchEngine};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: SearchEngine<dyn CatalogIndex>,
    /// Applied to requests that do not override individual settings
    pub defaults: SearchConfig,
}

impl AppState {
    pub fn new(index: Arc<dyn CatalogIndex>, defaults: SearchConfig) -> Self {
        Self {
            engine: SearchEngine::new(index),
            defaults,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/search", get(api::search_songs))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
