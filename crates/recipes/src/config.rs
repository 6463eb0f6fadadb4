//! Service configuration
//!
//! Everything the pipeline needs is carried in [`Config`] and handed to each
//! component at construction. The server binary fills it from CLI flags with
//! environment fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Published spreadsheet proxied to JSON; holds both the task and flow columns
pub const DEFAULT_FEED_URL: &str = "https://gs.jasonaa.me/?url=https://docs.google.com/spreadsheets/d/e/2PACX-1vSmp889ksBKKVVwpaxhlIzpDzXNOWjnszEXBP7SC5AyoebSIBFuX5qrcwwv6ud4RCYw2t_BZRhGLT0u/pubhtml?gid=1980586524&single=true";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
  #[error("An API key is required (set OPENAI_API_KEY or pass --openai-api-key)")]
  MissingApiKey,

  #[error("The {0} URL must not be empty")]
  EmptyUrl(&'static str),

  #[error("Temperature must be between 0 and 2, got {0}")]
  Temperature(f32),

  #[error("Timeout must be at least one second")]
  ZeroTimeout,
}

/// Where the two spreadsheet collections come from
#[derive(Debug, Clone)]
pub struct FeedConfig {
  pub tasks_url: String,
  pub flow_url: String,
  pub timeout_secs: u64,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      tasks_url: DEFAULT_FEED_URL.to_string(),
      flow_url: DEFAULT_FEED_URL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl FeedConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// OpenAI-compatible embedding and chat endpoints
#[derive(Clone)]
pub struct ProviderConfig {
  pub api_key: String,
  pub base_url: String,
  pub embedding_model: String,
  pub chat_model: String,
  pub temperature: f32,
  pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProviderConfig")
      .field("api_key", &"<redacted>")
      .field("base_url", &self.base_url)
      .field("embedding_model", &self.embedding_model)
      .field("chat_model", &self.chat_model)
      .field("temperature", &self.temperature)
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

impl ProviderConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
      embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
      chat_model: DEFAULT_CHAT_MODEL.to_string(),
      temperature: DEFAULT_TEMPERATURE,
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// Endpoint URL under the configured base, tolerant of a trailing slash
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
  }
}

/// How the similarity index lives across requests
#[derive(Debug, Clone, PartialEq)]
pub enum IndexMode {
  /// Rebuilt from the task feed on every request
  Ephemeral,
  /// Loaded once from (or saved once to) a snapshot file and shared
  Persisted(PathBuf),
}

impl IndexMode {
  pub fn from_path(path: Option<PathBuf>) -> Self {
    path.map_or(IndexMode::Ephemeral, IndexMode::Persisted)
  }

  pub fn describe(&self) -> String {
    match self {
      IndexMode::Ephemeral => "ephemeral".to_string(),
      IndexMode::Persisted(path) => format!("persisted ({})", path.display()),
    }
  }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct Config {
  pub bind: SocketAddr,
  pub feed: FeedConfig,
  pub provider: ProviderConfig,
  pub index: IndexMode,
  pub journal_path: PathBuf,
}

impl Config {
  /// Reject settings that would only fail later, mid-request
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.provider.api_key.trim().is_empty() {
      return Err(ConfigError::MissingApiKey);
    }
    if self.feed.tasks_url.trim().is_empty() {
      return Err(ConfigError::EmptyUrl("tasks feed"));
    }
    if self.feed.flow_url.trim().is_empty() {
      return Err(ConfigError::EmptyUrl("flow feed"));
    }
    if self.provider.base_url.trim().is_empty() {
      return Err(ConfigError::EmptyUrl("provider base"));
    }
    if !(0.0..=2.0).contains(&self.provider.temperature) {
      return Err(ConfigError::Temperature(self.provider.temperature));
    }
    if self.feed.timeout_secs == 0 || self.provider.timeout_secs == 0 {
      return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
  }
}

/// Default location of the request journal
pub fn default_journal_path() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_else(std::env::temp_dir)
    .join(".recipes")
    .join("requests.logs.jsonl")
}
