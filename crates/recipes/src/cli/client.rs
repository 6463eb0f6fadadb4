//! HTTP client for the recipes REST API

use anyhow::{anyhow, Result};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::server::types::{
  BaseResponse, ErrorResponse, GetRecipeRequest, LogsResponse, RebuildIndexResponse, RecipeResponse,
  StatusResponse,
};

/// Configuration for the recipes HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the recipes server (e.g., "http://localhost:5000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

/// HTTP client for the recipes REST API
pub struct RecipesClient {
  client: Client,
  config: ClientConfig,
}

impl RecipesClient {
  pub fn with_config(config: ClientConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Ask the server for a recipe suggestion
  pub async fn get_recipe(&self, recipe_name: &str) -> Result<RecipeResponse> {
    let request = GetRecipeRequest { recipe_name: Some(recipe_name.to_string()) };
    let response = self.client.post(self.url("get_recipe")).json(&request).send().await?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await?;
      let message = serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);
      return Err(anyhow!("Recipe request failed ({}): {}", status.as_u16(), message));
    }

    Ok(response.json().await?)
  }

  /// Server health and index state
  pub async fn status(&self) -> Result<StatusResponse> {
    let response = self.client.get(self.url("status")).send().await?;
    Ok(envelope::<StatusResponse>(response, "Failed to get status").await?.data)
  }

  /// Recent journal entries
  pub async fn logs(&self, limit: usize, level: &str) -> Result<LogsResponse> {
    let response = self
      .client
      .get(self.url("logs"))
      .query(&[("limit", limit.to_string()), ("level", level.to_string())])
      .send()
      .await?;
    Ok(envelope::<LogsResponse>(response, "Failed to get logs").await?.data)
  }

  /// Rebuild the server's persisted index
  pub async fn rebuild_index(&self) -> Result<RebuildIndexResponse> {
    let response = self.client.post(self.url("index/rebuild")).send().await?;
    Ok(envelope::<RebuildIndexResponse>(response, "Failed to rebuild index").await?.data)
  }
}

/// Decode a `BaseResponse`, surfacing its error list on failure
async fn envelope<T: serde::de::DeserializeOwned>(response: Response, context: &str) -> Result<BaseResponse<T>> {
  if !response.status().is_success() {
    let body = response.text().await?;
    let message = serde_json::from_str::<BaseResponse<serde_json::Value>>(&body)
      .ok()
      .and_then(|parsed| parsed.errors.first().map(|e| e.message.clone()))
      .unwrap_or(body);
    return Err(anyhow!("{}: {}", context, message));
  }

  Ok(response.json().await?)
}
