//! Recipe endpoint handler

use axum::{
  extract::{rejection::JsonRejection, Extension, State},
  http::StatusCode,
  response::Json,
};

use crate::error::RecipeError;
use crate::server::{
  middleware::RequestContext,
  types::{ErrorResponse, GetRecipeRequest, RecipeResponse},
  AppState,
};

type RecipeResult = Result<Json<RecipeResponse>, (StatusCode, Json<ErrorResponse>)>;

/// POST /get_recipe - Match a free-text request to a task and suggest steps
pub async fn get_recipe(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<GetRecipeRequest>, JsonRejection>,
) -> RecipeResult {
  let Json(request) = match payload {
    Ok(request) => request,
    Err(rejection) => {
      let message = format!("Invalid request body: {}", rejection.body_text());
      context.log_warn(&message, "recipes-api").await;
      return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))));
    }
  };

  match state.service.recommend(request.recipe_name.as_deref()).await {
    Ok(recommendation) => {
      context
        .log_success(
          &format!(
            "Matched '{}' at {}%",
            recommendation.matched.journey_name, recommendation.similarity_percent
          ),
          "recipes-api",
        )
        .await;
      Ok(Json(RecipeResponse::from(recommendation)))
    }
    Err(e) => Err(error_response(&context, e).await),
  }
}

/// Journal a pipeline failure and shape it as `{"error": ...}`
pub(crate) async fn error_response(
  context: &RequestContext,
  error: RecipeError,
) -> (StatusCode, Json<ErrorResponse>) {
  let status = error.status_code();
  let message = error.to_string();

  if status.is_server_error() {
    context.log_error(&message, "recipes-api").await;
  } else {
    context.log_warn(&message, "recipes-api").await;
  }

  (status, Json(ErrorResponse::new(message)))
}
