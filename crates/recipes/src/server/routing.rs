//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::handlers::{index, logs, recipes, status};
use crate::server::middleware::request_context_middleware;
use crate::server::AppState;

/// Create the application router with request context, tracing and CORS
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Recipe matching
    .route("/get_recipe", post(recipes::get_recipe))
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    // Request journal
    .route("/logs", get(logs::get_logs))
    // Index maintenance
    .route("/index/rebuild", post(index::rebuild_index))
    .layer(middleware::from_fn_with_state(state.clone(), request_context_middleware))
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
    .with_state(state)
}
