//! Spreadsheet feed loading
//!
//! One GET per collection, no retries. Every row is decoded into its typed
//! schema here; a row that does not fit fails the whole load with its index.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::models::{FlowRow, TaskRow};

/// Fetch `url` and decode it as a JSON array of `T`
pub async fn load_collection<T: DeserializeOwned>(client: &Client, url: &str) -> Result<Vec<T>, FeedError> {
  let response =
    client.get(url).send().await.map_err(|e| FeedError::remote_fetch(url, e.to_string()))?;

  let status = response.status();
  if !status.is_success() {
    return Err(FeedError::remote_fetch(url, format!("HTTP status {status}")));
  }

  let body = response.text().await.map_err(|e| FeedError::remote_fetch(url, e.to_string()))?;
  let value: serde_json::Value = serde_json::from_str(&body)
    .map_err(|e| FeedError::remote_fetch(url, format!("body is not valid JSON: {e}")))?;

  let serde_json::Value::Array(rows) = value else {
    return Err(FeedError::remote_fetch(url, "expected a JSON array of rows"));
  };

  let records = rows
    .into_iter()
    .enumerate()
    .map(|(row, value)| {
      serde_json::from_value::<T>(value).map_err(|e| FeedError::schema(url, row, e.to_string()))
    })
    .collect::<Result<Vec<T>, FeedError>>()?;

  debug!(url, rows = records.len(), "feed loaded");
  Ok(records)
}

/// HTTP client bound to the configured task and flow feeds
#[derive(Clone)]
pub struct FeedClient {
  client: Client,
  config: FeedConfig,
}

impl FeedClient {
  pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
    let client = Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| FeedError::remote_fetch(&config.tasks_url, format!("failed to build HTTP client: {e}")))?;

    Ok(Self { client, config })
  }

  pub async fn load_tasks(&self) -> Result<Vec<TaskRow>, FeedError> {
    load_collection(&self.client, &self.config.tasks_url).await
  }

  pub async fn load_flow(&self) -> Result<Vec<FlowRow>, FeedError> {
    load_collection(&self.client, &self.config.flow_url).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::Server;

  const ROWS: &str = r#"[
    {
      "Journey Name (N)": "Improve employee experience",
      "Agenda Items (Description)": "Kickoff workshop",
      "Methods (N)": "Pulse Survey",
      "Uniques": "Pulse Survey",
      "Description (short)": "Quick check-in",
      "AI Response": "Run a pulse survey"
    },
    {
      "Journey Name (N)": "Plan an offsite",
      "Agenda Items (Description)": "Pick a venue",
      "Methods (N)": "Venue Scout"
    }
  ]"#;

  fn feed_client(server: &Server) -> FeedClient {
    FeedClient::new(FeedConfig {
      tasks_url: format!("{}/tasks", server.url()),
      flow_url: format!("{}/flow", server.url()),
      timeout_secs: 5,
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_loads_both_collections_from_one_sheet() {
    let mut server = Server::new_async().await;
    let _tasks = server
      .mock("GET", "/tasks")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(ROWS)
      .create_async()
      .await;
    let _flow = server
      .mock("GET", "/flow")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(ROWS)
      .create_async()
      .await;

    let client = feed_client(&server);
    let tasks = client.load_tasks().await.unwrap();
    let flow = client.load_flow().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].unique_id.as_deref(), Some("Pulse Survey"));
    assert_eq!(tasks[1].unique_id, None);
    assert_eq!(flow[1].agenda_item, "Pick a venue");
  }

  #[tokio::test]
  async fn test_non_success_status_is_remote_fetch_error() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/tasks").with_status(503).create_async().await;

    let error = feed_client(&server).load_tasks().await.unwrap_err();
    match error {
      FeedError::RemoteFetch { message, .. } => assert!(message.contains("503")),
      other => panic!("Expected RemoteFetch, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_invalid_json_is_remote_fetch_error() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/tasks").with_status(200).with_body("<html>").create_async().await;

    let error = feed_client(&server).load_tasks().await.unwrap_err();
    assert!(matches!(error, FeedError::RemoteFetch { .. }));
  }

  #[tokio::test]
  async fn test_non_array_body_is_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("GET", "/tasks")
      .with_status(200)
      .with_body(r#"{"error": "sheet not published"}"#)
      .create_async()
      .await;

    let error = feed_client(&server).load_tasks().await.unwrap_err();
    assert!(error.to_string().contains("JSON array"));
  }

  #[tokio::test]
  async fn test_missing_column_is_schema_error_with_row() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("GET", "/flow")
      .with_status(200)
      .with_body(
        r#"[
          {"Journey Name (N)": "A", "Agenda Items (Description)": "x", "Methods (N)": "M1"},
          {"Journey Name (N)": "B", "Agenda Items (Description)": "y"}
        ]"#,
      )
      .create_async()
      .await;

    let error = feed_client(&server).load_flow().await.unwrap_err();
    match error {
      FeedError::Schema { row, message, .. } => {
        assert_eq!(row, 1);
        assert!(message.contains("Methods (N)"));
      }
      other => panic!("Expected Schema, got: {other:?}"),
    }
  }
}
