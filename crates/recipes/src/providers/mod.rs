//! Hosted model providers
//!
//! The pipeline only sees the two traits below; the OpenAI-compatible HTTP
//! implementations live in [`openai`].

use async_trait::async_trait;

use crate::error::ProviderError;

pub mod openai;

pub use openai::{OpenAiChat, OpenAiEmbeddings};

/// Turns text into fixed-dimension vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
  /// Model identifier, recorded in persisted index snapshots
  fn model(&self) -> &str;

  /// Embed a batch of documents, one vector per input in input order
  async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

  /// Embed a single query
  async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
    let mut vectors = self.embed_documents(&[text.to_string()]).await?;
    vectors.pop().ok_or_else(|| ProviderError::Decode("no embedding returned for query".to_string()))
  }
}

/// Single-turn text completion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
