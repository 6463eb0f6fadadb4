//! OpenAI-compatible embeddings and chat completions over HTTP

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ChatModel, EmbeddingProvider};
use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Inputs per embeddings request
const EMBEDDING_BATCH_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
  index: usize,
  embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
  content: Option<String>,
}

fn build_http(config: &ProviderConfig) -> Result<Client, ProviderError> {
  Ok(Client::builder().timeout(config.timeout()).build()?)
}

/// Turn a non-success response into [`ProviderError::Status`]
async fn check_status(response: Response) -> Result<Response, ProviderError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(ProviderError::Status { status: status.as_u16(), body })
}

/// `/embeddings` client
pub struct OpenAiEmbeddings {
  http: Client,
  config: ProviderConfig,
}

impl OpenAiEmbeddings {
  pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
    Ok(Self { http: build_http(config)?, config: config.clone() })
  }

  async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
    debug!(model = %self.config.embedding_model, count = texts.len(), "embed_batch: called");
    let body = json!({
      "model": self.config.embedding_model,
      "input": texts,
    });

    let response = self
      .http
      .post(self.config.endpoint("embeddings"))
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let parsed: EmbeddingsResponse = check_status(response)
      .await?
      .json()
      .await
      .map_err(|e| ProviderError::Decode(e.to_string()))?;

    if parsed.data.len() != texts.len() {
      return Err(ProviderError::Decode(format!(
        "expected {} embeddings, got {}",
        texts.len(),
        parsed.data.len()
      )));
    }

    let mut data = parsed.data;
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
  }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
  fn model(&self) -> &str {
    &self.config.embedding_model
  }

  async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(EMBEDDING_BATCH_SIZE) {
      vectors.extend(self.embed_batch(chunk).await?);
    }
    Ok(vectors)
  }
}

/// `/chat/completions` client
pub struct OpenAiChat {
  http: Client,
  config: ProviderConfig,
}

impl OpenAiChat {
  pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
    Ok(Self { http: build_http(config)?, config: config.clone() })
  }
}

#[async_trait]
impl ChatModel for OpenAiChat {
  async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
    debug!(model = %self.config.chat_model, "complete: called");
    let body = json!({
      "model": self.config.chat_model,
      "temperature": self.config.temperature,
      "messages": [{ "role": "user", "content": prompt }],
    });

    let response = self
      .http
      .post(self.config.endpoint("chat/completions"))
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let parsed: ChatResponse = check_status(response)
      .await?
      .json()
      .await
      .map_err(|e| ProviderError::Decode(e.to_string()))?;

    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .ok_or_else(|| ProviderError::Decode("response has no message content".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::{Matcher, Server};

  fn provider_config(server: &Server) -> ProviderConfig {
    let mut config = ProviderConfig::new("sk-test");
    config.base_url = format!("{}/v1", server.url());
    config.embedding_model = "test-embedding".to_string();
    config.chat_model = "test-chat".to_string();
    config
  }

  #[tokio::test]
  async fn test_embeddings_are_returned_in_input_order() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/embeddings")
      .match_header("authorization", "Bearer sk-test")
      .match_body(Matcher::PartialJson(json!({ "model": "test-embedding", "input": ["a", "b"] })))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"data": [
          {"index": 1, "embedding": [0.0, 1.0]},
          {"index": 0, "embedding": [1.0, 0.0]}
        ]}"#,
      )
      .create_async()
      .await;

    let embeddings = OpenAiEmbeddings::from_config(&provider_config(&server)).unwrap();
    let vectors = embeddings.embed_documents(&["a".to_string(), "b".to_string()]).await.unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert_eq!(embeddings.model(), "test-embedding");
  }

  #[tokio::test]
  async fn test_embed_query_uses_single_input() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/embeddings")
      .match_body(Matcher::PartialJson(json!({ "input": ["hello"] })))
      .with_status(200)
      .with_body(r#"{"data": [{"index": 0, "embedding": [0.5, 0.5]}]}"#)
      .create_async()
      .await;

    let embeddings = OpenAiEmbeddings::from_config(&provider_config(&server)).unwrap();
    assert_eq!(embeddings.embed_query("hello").await.unwrap(), vec![0.5, 0.5]);
  }

  #[tokio::test]
  async fn test_embedding_count_mismatch_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/embeddings")
      .with_status(200)
      .with_body(r#"{"data": []}"#)
      .create_async()
      .await;

    let embeddings = OpenAiEmbeddings::from_config(&provider_config(&server)).unwrap();
    let error = embeddings.embed_documents(&["a".to_string()]).await.unwrap_err();
    assert!(matches!(error, ProviderError::Decode(_)));
  }

  #[tokio::test]
  async fn test_error_status_carries_body() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/embeddings")
      .with_status(401)
      .with_body(r#"{"error": {"message": "bad key"}}"#)
      .create_async()
      .await;

    let embeddings = OpenAiEmbeddings::from_config(&provider_config(&server)).unwrap();
    match embeddings.embed_query("x").await.unwrap_err() {
      ProviderError::Status { status, body } => {
        assert_eq!(status, 401);
        assert!(body.contains("bad key"));
      }
      other => panic!("Expected Status error, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_chat_completion_returns_first_choice() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/chat/completions")
      .match_body(Matcher::PartialJson(json!({
        "model": "test-chat",
        "messages": [{ "role": "user", "content": "Say hi" }],
      })))
      .with_status(200)
      .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Hi there"}}]}"#)
      .create_async()
      .await;

    let chat = OpenAiChat::from_config(&provider_config(&server)).unwrap();
    assert_eq!(chat.complete("Say hi").await.unwrap(), "Hi there");
  }

  #[tokio::test]
  async fn test_chat_without_choices_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/chat/completions")
      .with_status(200)
      .with_body(r#"{"choices": []}"#)
      .create_async()
      .await;

    let chat = OpenAiChat::from_config(&provider_config(&server)).unwrap();
    assert!(matches!(chat.complete("x").await.unwrap_err(), ProviderError::Decode(_)));
  }
}
