//! Index maintenance endpoint handler

use axum::{
  extract::{Extension, State},
  http::StatusCode,
  response::Json,
};
use uuid::Uuid;

use crate::server::{
  middleware::RequestContext,
  types::{ApiError, BaseResponse, RebuildIndexResponse},
  AppState,
};

/// POST /index/rebuild - Reload the task feed and replace the persisted index
///
/// Answers 409 when the server runs without a persisted index.
pub async fn rebuild_index(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<RebuildIndexResponse>>, (StatusCode, Json<BaseResponse<()>>)> {
  let transaction_id = Uuid::new_v4();
  context.log_info("Rebuilding similarity index", "index-api").await;

  match state.service.rebuild_index().await {
    Ok(Some(indexed_tasks)) => {
      context.log_success(&format!("Index rebuilt with {indexed_tasks} tasks"), "index-api").await;
      Ok(Json(BaseResponse::success(RebuildIndexResponse { indexed_tasks }, transaction_id)))
    }
    Ok(None) => {
      let message = "Index is rebuilt per request; start the server with an index path to persist it";
      context.log_warn(message, "index-api").await;
      let error = ApiError::new("index_not_persisted", message);
      Err((StatusCode::CONFLICT, Json(BaseResponse::<()>::error(vec![error], transaction_id))))
    }
    Err(e) => {
      let message = format!("Failed to rebuild index: {e}");
      context.log_error(&message, "index-api").await;
      let error = ApiError::new("index_rebuild_failed", &message);
      Err((e.status_code(), Json(BaseResponse::<()>::error(vec![error], transaction_id))))
    }
  }
}
