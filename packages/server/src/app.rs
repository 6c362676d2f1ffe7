//! Router assembly and shared state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use distill::{JobQueue, RunContext};

use crate::routes;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<RunContext>,
    pub queue: Arc<dyn JobQueue>,
    pub return_markdown: bool,
}

/// Build the application router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_handler))
        .route("/v1/digests", post(routes::digests::digest_handler))
        .route("/v1/digests/jobs", post(routes::digests::enqueue_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
