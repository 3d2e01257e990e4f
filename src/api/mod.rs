//! HTTP API module
//!
//! The bridge's entry points for the host application, plus inspection
//! endpoints for what the widget currently shows.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/widget/update", post(update_handler))
        .route("/widget/state", get(state_handler))
        .route("/widget/entry", get(entry_handler))
        .route("/widget/reload", post(reload_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
