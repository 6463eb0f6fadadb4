//! Status and version endpoint handlers

use axum::{extract::State, response::Json};
use uuid::Uuid;

use crate::server::types::{BaseResponse, StatusResponse, VersionResponse};
use crate::server::AppState;

/// GET /status - Health check with index state
pub async fn status(State(state): State<AppState>) -> Json<BaseResponse<StatusResponse>> {
  let index = state.service.index_status();
  let response = StatusResponse {
    status: "healthy".to_string(),
    index_mode: index.mode,
    indexed_tasks: index.loaded_entries,
    index_building: index.building,
  };

  Json(BaseResponse::success(response, Uuid::new_v4()))
}

/// GET /version - Returns current API version
pub async fn version() -> Json<BaseResponse<VersionResponse>> {
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  Json(BaseResponse::success(response, Uuid::new_v4()))
}
