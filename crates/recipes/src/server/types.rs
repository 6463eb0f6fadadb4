//! REST API types with schemars annotations for OpenAPI generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MethodRecord;
use crate::pipeline::Recommendation;

// Recipe Endpoint
// ===============

/// Request for /get_recipe
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetRecipeRequest {
  /// Free-text description of what the caller wants to do
  #[serde(default)]
  pub recipe_name: Option<String>,
}

/// Successful /get_recipe response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecipeResponse {
  /// Suggestion text generated by the chat model
  pub response: String,

  /// How the suggestion was derived
  pub details: RecipeDetails,
}

/// Match and method details behind a suggestion
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecipeDetails {
  /// Name of the nearest task
  #[serde(rename = "Closest Luma Task")]
  pub closest_task: String,

  /// Resolved method identifiers joined with "| "
  #[serde(rename = "Methods")]
  pub methods: String,

  /// Resolved methods in flow order
  #[serde(rename = "Method Details")]
  pub method_details: Vec<MethodRecord>,

  /// Distance-derived similarity figure
  #[serde(rename = "Similarity")]
  pub similarity: String,
}

impl From<Recommendation> for RecipeResponse {
  fn from(recommendation: Recommendation) -> Self {
    let method_details = recommendation.enrichment.method_details();
    let methods = method_details.iter().map(|m| m.method.as_str()).collect::<Vec<_>>().join("| ");

    Self {
      response: recommendation.response,
      details: RecipeDetails {
        closest_task: recommendation.matched.journey_name,
        methods,
        method_details,
        similarity: format!("{:.2}% similar to that task", recommendation.similarity_percent),
      },
    }
  }
}

/// Error body for /get_recipe
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
  pub error: String,
}

impl ErrorResponse {
  pub fn new(error: impl Into<String>) -> Self {
    Self { error: error.into() }
  }
}

// Base Response Structure
// =======================

/// Envelope for the service endpoints (status, version, logs, index)
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for log correlation
  pub transaction_id: Uuid,

  /// Error information, omitted on success
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionInfo {
  /// The latest version of the API
  pub latest: String,

  /// The version that produced the response
  pub served: String,
}

impl VersionInfo {
  pub fn current() -> Self {
    let version = env!("CARGO_PKG_VERSION").to_string();
    Self { latest: version.clone(), served: version }
  }
}

/// API error information
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: VersionInfo::current(), transaction_id, errors: Vec::new(), data }
  }

  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: VersionInfo::current(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

// Service Endpoints
// =================

/// Response for /status
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  /// "ephemeral" or "persisted (<path>)"
  pub index_mode: String,
  /// Entries in the shared index, if one is loaded
  pub indexed_tasks: Option<usize>,
  /// The shared index is being loaded or rebuilt
  #[serde(default)]
  pub index_building: bool,
}

/// Response for /version
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

/// Query parameters for /logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsQuery {
  /// Maximum number of entries, most recent kept
  pub limit: Option<usize>,
  /// Level filter (info, warn, error, success, all)
  pub level: Option<String>,
}

/// Response for /logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<herald::journal::JournalEntry>,
}

/// Response for /index/rebuild
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RebuildIndexResponse {
  pub indexed_tasks: usize,
}
