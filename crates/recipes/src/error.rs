//! Error taxonomy for the recipe pipeline
//!
//! Each layer owns its error enum; [`RecipeError`] is what the request
//! pipeline surfaces and what the HTTP layer maps to status codes.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures loading a spreadsheet feed
#[derive(Error, Debug)]
pub enum FeedError {
  #[error("Failed to fetch feed {url}: {message}")]
  RemoteFetch { url: String, message: String },

  #[error("Feed {url} row {row} does not match the expected schema: {message}")]
  Schema { url: String, row: usize, message: String },
}

impl FeedError {
  pub fn remote_fetch(url: &str, message: impl Into<String>) -> Self {
    Self::RemoteFetch { url: url.to_string(), message: message.into() }
  }

  pub fn schema(url: &str, row: usize, message: impl Into<String>) -> Self {
    Self::Schema { url: url.to_string(), row, message: message.into() }
  }
}

/// Failures talking to the embedding or chat-completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
  #[error("Provider request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Provider returned status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("Unexpected provider response: {0}")]
  Decode(String),
}

/// Failures loading, saving or querying a similarity index
#[derive(Error, Debug)]
pub enum IndexError {
  #[error("Index file I/O failed for {path}: {source}")]
  Io { path: String, source: std::io::Error },

  #[error("Index snapshot {path} is corrupt: {message}")]
  Corrupt { path: String, message: String },

  #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },
}

/// Everything a recipe request can fail with
#[derive(Error, Debug)]
pub enum RecipeError {
  #[error("{0}")]
  Validation(String),

  #[error("Task not found")]
  TaskNotFound,

  #[error("Agenda Items or Methods not found for the task")]
  EnrichmentNotFound,

  #[error(transparent)]
  Feed(#[from] FeedError),

  #[error(transparent)]
  Provider(#[from] ProviderError),

  #[error(transparent)]
  Index(#[from] IndexError),
}

impl RecipeError {
  pub fn missing_recipe_name() -> Self {
    Self::Validation("No recipe name provided".to_string())
  }

  /// HTTP status the server answers with for this error
  pub fn status_code(&self) -> StatusCode {
    match self {
      RecipeError::Validation(_) => StatusCode::BAD_REQUEST,
      RecipeError::TaskNotFound | RecipeError::EnrichmentNotFound => StatusCode::NOT_FOUND,
      RecipeError::Feed(_) | RecipeError::Provider(_) => StatusCode::BAD_GATEWAY,
      RecipeError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}
