//! Query → closest task

use serde::Serialize;
use tracing::debug;

use crate::error::{ProviderError, RecipeError};
use crate::index::SimilarityIndex;
use crate::providers::EmbeddingProvider;

/// The single nearest task for a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
  pub journey_name: String,
  /// Euclidean distance between query and task embeddings
  pub distance: f32,
}

/// Embed `query` and return its nearest task, or `None` for an empty index
///
/// There is no threshold: an unrelated query still gets the closest task. A
/// query vector whose dimension differs from the index is a provider error.
pub async fn find_nearest(
  embedder: &dyn EmbeddingProvider,
  index: &SimilarityIndex,
  query: &str,
) -> Result<Option<MatchResult>, RecipeError> {
  if index.is_empty() {
    return Ok(None);
  }

  let query_vector = embedder.embed_query(query).await?;
  if query_vector.len() != index.dimension() {
    return Err(
      ProviderError::Decode(format!(
        "query embedding has dimension {}, index has {}",
        query_vector.len(),
        index.dimension()
      ))
      .into(),
    );
  }

  let Some((position, distance)) = index.nearest(&query_vector)? else {
    return Ok(None);
  };

  let journey_name = index.names()[position].clone();
  debug!(%journey_name, distance, "find_nearest: matched");
  Ok(Some(MatchResult { journey_name, distance }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use axum::http::StatusCode;

  /// Letter-frequency embedding: identical strings map to identical vectors
  struct LetterEmbedder;

  fn letters(text: &str) -> Vec<f32> {
    let mut counts = vec![0.0; 26];
    for c in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
      counts[(c as u8 - b'a') as usize] += 1.0;
    }
    counts
  }

  #[async_trait]
  impl EmbeddingProvider for LetterEmbedder {
    fn model(&self) -> &str {
      "letters"
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
      Ok(texts.iter().map(|t| letters(t)).collect())
    }
  }

  fn index(names: &[&str]) -> SimilarityIndex {
    SimilarityIndex::from_entries(
      "letters",
      names.iter().map(|n| n.to_string()).collect(),
      names.iter().map(|n| letters(n)).collect(),
    )
    .unwrap()
  }

  #[tokio::test]
  async fn test_exact_name_matches_with_zero_distance() {
    let index = index(&["Plan an offsite", "Improve employee experience", "Hire an engineer"]);
    let result =
      find_nearest(&LetterEmbedder, &index, "Improve employee experience").await.unwrap().unwrap();

    assert_eq!(result.journey_name, "Improve employee experience");
    assert_eq!(result.distance, 0.0);
  }

  #[tokio::test]
  async fn test_unrelated_query_still_matches() {
    let index = index(&["Plan an offsite"]);
    let result = find_nearest(&LetterEmbedder, &index, "zzzz qqqq").await.unwrap().unwrap();

    assert_eq!(result.journey_name, "Plan an offsite");
    assert!(result.distance > 0.0);
  }

  #[tokio::test]
  async fn test_distance_is_minimum_over_all_tasks() {
    let names = ["Plan an offsite", "Improve employee experience", "Hire an engineer", "Run a retro"];
    let index = index(&names);
    let query = "improve the hiring experience";

    let result = find_nearest(&LetterEmbedder, &index, query).await.unwrap().unwrap();

    let q = letters(query);
    let minimum = names
      .iter()
      .map(|n| letters(n).iter().zip(&q).map(|(a, b)| (a - b) * (a - b)).sum::<f32>().sqrt())
      .fold(f32::INFINITY, f32::min);
    assert!((result.distance - minimum).abs() < 1e-5);
  }

  #[tokio::test]
  async fn test_empty_index_is_absent() {
    let result = find_nearest(&LetterEmbedder, &SimilarityIndex::empty("letters"), "anything").await;
    assert_eq!(result.unwrap(), None);
  }

  /// Returns vectors one dimension short of the letter index
  struct TruncatingEmbedder;

  #[async_trait]
  impl EmbeddingProvider for TruncatingEmbedder {
    fn model(&self) -> &str {
      "letters"
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
      Ok(texts.iter().map(|t| letters(t)[..25].to_vec()).collect())
    }
  }

  #[tokio::test]
  async fn test_query_dimension_drift_is_an_upstream_error() {
    let index = index(&["Plan an offsite"]);
    let error = find_nearest(&TruncatingEmbedder, &index, "offsite").await.unwrap_err();

    assert!(matches!(error, RecipeError::Provider(ProviderError::Decode(_))));
    assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
  }
}
