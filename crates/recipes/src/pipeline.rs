//! Request pipeline
//!
//! `Received → Validated → DataLoaded → Matched → Enriched → Composed`
//!
//! Each step either advances or exits early with a [`RecipeError`]. No
//! intermediate state survives a request except the shared index in
//! persisted mode.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::{Config, IndexMode};
use crate::enricher::{enrich, Enrichment};
use crate::error::RecipeError;
use crate::index::{build_index, load_index_if_present, save_index, SimilarityIndex};
use crate::loader::FeedClient;
use crate::matcher::{find_nearest, MatchResult};
use crate::models::TaskRow;
use crate::providers::{ChatModel, EmbeddingProvider, OpenAiChat, OpenAiEmbeddings};
use crate::responder::{compose_suggestion, similarity_percent};

/// A fully answered recipe request
#[derive(Debug, Clone)]
pub struct Recommendation {
  pub response: String,
  pub matched: MatchResult,
  pub enrichment: Enrichment,
  pub similarity_percent: f64,
}

/// Where the request's index comes from
enum IndexStore {
  Ephemeral,
  Persisted { path: PathBuf, shared: RwLock<Option<Arc<SimilarityIndex>>> },
}

/// Snapshot of the index state for status reporting
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStatus {
  pub mode: String,
  pub loaded_entries: Option<usize>,
  /// A load, build or rebuild holds the index lock
  pub building: bool,
}

/// The recipe matcher with its collaborators
pub struct RecipeService {
  feeds: FeedClient,
  embedder: Arc<dyn EmbeddingProvider>,
  chat: Arc<dyn ChatModel>,
  mode: IndexMode,
  index: IndexStore,
}

impl RecipeService {
  /// Wire the service against the configured OpenAI-compatible provider
  pub fn from_config(config: &Config) -> Result<Self, RecipeError> {
    let embedder = Arc::new(OpenAiEmbeddings::from_config(&config.provider)?);
    let chat = Arc::new(OpenAiChat::from_config(&config.provider)?);
    Self::new(config, embedder, chat)
  }

  /// Wire the service with explicit providers
  pub fn new(
    config: &Config,
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatModel>,
  ) -> Result<Self, RecipeError> {
    let index = match &config.index {
      IndexMode::Ephemeral => IndexStore::Ephemeral,
      IndexMode::Persisted(path) => {
        IndexStore::Persisted { path: path.clone(), shared: RwLock::new(None) }
      }
    };

    Ok(Self {
      feeds: FeedClient::new(config.feed.clone())?,
      embedder,
      chat,
      mode: config.index.clone(),
      index,
    })
  }

  /// Answer one recipe request
  pub async fn recommend(&self, recipe_name: Option<&str>) -> Result<Recommendation, RecipeError> {
    // Validated
    let query = recipe_name
      .filter(|name| !name.is_empty())
      .ok_or_else(RecipeError::missing_recipe_name)?;

    // DataLoaded
    let task_rows = self.feeds.load_tasks().await?;
    let flow_rows = self.feeds.load_flow().await?;
    debug!(tasks = task_rows.len(), flow = flow_rows.len(), "recommend: feeds loaded");

    // Matched
    let index = self.index_for(&task_rows).await?;
    let matched =
      find_nearest(self.embedder.as_ref(), &index, query).await?.ok_or(RecipeError::TaskNotFound)?;

    // Enriched
    let enrichment =
      enrich(&matched.journey_name, &flow_rows, &task_rows).ok_or(RecipeError::EnrichmentNotFound)?;

    // Composed
    let response = compose_suggestion(self.chat.as_ref(), &matched, &enrichment, query).await?;

    Ok(Recommendation {
      response,
      similarity_percent: similarity_percent(matched.distance),
      matched,
      enrichment,
    })
  }

  /// Index to match against: fresh per request, or the shared persisted one
  async fn index_for(&self, task_rows: &[TaskRow]) -> Result<Arc<SimilarityIndex>, RecipeError> {
    let (path, shared) = match &self.index {
      IndexStore::Ephemeral => {
        return Ok(Arc::new(build_index(self.embedder.as_ref(), task_rows).await?));
      }
      IndexStore::Persisted { path, shared } => (path, shared),
    };

    if let Some(index) = shared.read().await.as_ref() {
      return Ok(index.clone());
    }

    // Concurrent first requests queue here; only one loads or builds
    let mut guard = shared.write().await;
    if let Some(index) = guard.as_ref() {
      return Ok(index.clone());
    }

    let index = match load_index_if_present(path, self.embedder.model())? {
      Some(index) => {
        herald::info!("Loaded index snapshot {} ({} tasks)", path.display(), index.len());
        index
      }
      None => self.build_and_save(task_rows, path).await?,
    };

    let index = Arc::new(index);
    *guard = Some(index.clone());
    Ok(index)
  }

  async fn build_and_save(&self, task_rows: &[TaskRow], path: &Path) -> Result<SimilarityIndex, RecipeError> {
    let index = build_index(self.embedder.as_ref(), task_rows).await?;
    save_index(&index, path)?;
    herald::success!("Saved index snapshot {} ({} tasks)", path.display(), index.len());
    Ok(index)
  }

  /// Reload the task feed, rebuild and save the persisted index, then swap it in
  ///
  /// Returns the number of indexed tasks, or `None` in ephemeral mode where
  /// there is nothing to rebuild.
  pub async fn rebuild_index(&self) -> Result<Option<usize>, RecipeError> {
    let IndexStore::Persisted { path, shared } = &self.index else {
      return Ok(None);
    };

    let task_rows = self.feeds.load_tasks().await?;
    let mut guard = shared.write().await;
    let index = self.build_and_save(&task_rows, path).await?;
    let entries = index.len();
    *guard = Some(Arc::new(index));
    Ok(Some(entries))
  }

  /// Current index state; never waits on a build in progress
  pub fn index_status(&self) -> IndexStatus {
    let (loaded_entries, building) = match &self.index {
      IndexStore::Ephemeral => (None, false),
      IndexStore::Persisted { shared, .. } => match shared.try_read() {
        Ok(guard) => (guard.as_ref().map(|index| index.len()), false),
        Err(_) => (None, true),
      },
    };
    IndexStatus { mode: self.mode.describe(), loaded_entries, building }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{FeedConfig, ProviderConfig};
  use crate::error::ProviderError;
  use crate::providers::MockChatModel;
  use async_trait::async_trait;
  use tempfile::TempDir;

  struct FixedEmbedder;

  #[async_trait]
  impl EmbeddingProvider for FixedEmbedder {
    fn model(&self) -> &str {
      "fixed"
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
      Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
  }

  fn service(index: IndexMode) -> RecipeService {
    let config = Config {
      bind: "127.0.0.1:0".parse().unwrap(),
      feed: FeedConfig::default(),
      provider: ProviderConfig::new("test-key"),
      index,
      journal_path: std::env::temp_dir().join("unused.jsonl"),
    };
    RecipeService::new(&config, Arc::new(FixedEmbedder), Arc::new(MockChatModel::new())).unwrap()
  }

  #[tokio::test]
  async fn test_status_reports_building_while_index_lock_is_held() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(IndexMode::Persisted(temp_dir.path().join("tasks.json")));
    let IndexStore::Persisted { shared, .. } = &service.index else {
      panic!("expected a persisted index store");
    };

    let guard = shared.write().await;
    let status = service.index_status();
    assert!(status.building);
    assert_eq!(status.loaded_entries, None);
    drop(guard);

    let status = service.index_status();
    assert!(!status.building);
    assert!(status.mode.starts_with("persisted"));
  }

  #[tokio::test]
  async fn test_status_reports_loaded_entries() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(IndexMode::Persisted(temp_dir.path().join("tasks.json")));
    let IndexStore::Persisted { shared, .. } = &service.index else {
      panic!("expected a persisted index store");
    };

    let index =
      SimilarityIndex::from_entries("fixed", vec!["Plan an offsite".to_string()], vec![vec![1.0, 0.0]])
        .unwrap();
    *shared.write().await = Some(Arc::new(index));

    assert_eq!(service.index_status().loaded_entries, Some(1));
  }

  #[tokio::test]
  async fn test_ephemeral_status_is_never_building() {
    let status = service(IndexMode::Ephemeral).index_status();
    assert_eq!(status, IndexStatus { mode: "ephemeral".to_string(), loaded_entries: None, building: false });
  }
}
