//! Web surface: domain tabs as HTML pages plus a small JSON API

pub mod handlers;
pub mod page;

use crate::models::inference::InferenceEngine;
use axum::routing::{get, post};
use axum::Router;
use handlers::{
    assess_api_handler, domains_handler, form_handler, health_handler, index_handler,
    stats_handler, submit_handler,
};
use std::sync::Arc;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>) -> Arc<Self> {
        Arc::new(Self { engine })
    }
}

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/domains", get(domains_handler))
        .route("/api/v1/stats", get(stats_handler))
        .route("/api/v1/assess/:domain", post(assess_api_handler))
        .route("/:domain", get(form_handler).post(submit_handler))
        .with_state(state)
}
