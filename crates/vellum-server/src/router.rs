use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AuthProvider};
use crate::handler;
use crate::retrieval::Retriever;

/// Shared, read-only state of every request.
#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<Retriever>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(retriever: Arc<Retriever>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { retriever, auth }
    }
}

/// Build the axum router with all Vellum endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/object/", get(handler::empty_object_handler))
        .route("/object/:object_id", get(handler::object_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::resolve_client))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
