//! Recipes REST Server
//!
//! Serves `POST /get_recipe` plus status, logs and index maintenance endpoints.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use recipes::config::{
  default_journal_path, Config, FeedConfig, IndexMode, ProviderConfig, DEFAULT_CHAT_MODEL,
  DEFAULT_EMBEDDING_MODEL, DEFAULT_FEED_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_TEMPERATURE,
  DEFAULT_TIMEOUT_SECS,
};
use recipes::server::start_server;

#[derive(Parser)]
#[command(name = "recipe_server")]
#[command(about = "Recipes REST API Server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
  /// Server bind address
  #[arg(long, env = "RECIPES_BIND", default_value = "127.0.0.1:5000")]
  bind: SocketAddr,

  /// JSON feed with one row per task and method
  #[arg(long, env = "RECIPES_TASKS_URL", default_value = DEFAULT_FEED_URL)]
  tasks_url: String,

  /// JSON feed with one row per task, agenda item and method
  #[arg(long, env = "RECIPES_FLOW_URL", default_value = DEFAULT_FEED_URL)]
  flow_url: String,

  /// API key for the embedding and chat provider
  #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
  openai_api_key: String,

  /// Base URL of an OpenAI-compatible API
  #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
  openai_base_url: String,

  #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL)]
  embedding_model: String,

  #[arg(long, default_value = DEFAULT_CHAT_MODEL)]
  chat_model: String,

  /// Chat model sampling temperature
  #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
  temperature: f32,

  /// Snapshot file for a shared, persisted index; rebuilt per request when omitted
  #[arg(long, env = "RECIPES_INDEX_PATH")]
  index_path: Option<PathBuf>,

  /// Timeout for feed and provider calls
  #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout_secs: u64,

  /// Request journal location
  #[arg(long, env = "RECIPES_JOURNAL")]
  journal: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

impl Args {
  fn into_config(self) -> Config {
    Config {
      bind: self.bind,
      feed: FeedConfig { tasks_url: self.tasks_url, flow_url: self.flow_url, timeout_secs: self.timeout_secs },
      provider: ProviderConfig {
        api_key: self.openai_api_key,
        base_url: self.openai_base_url,
        embedding_model: self.embedding_model,
        chat_model: self.chat_model,
        temperature: self.temperature,
        timeout_secs: self.timeout_secs,
      },
      index: IndexMode::from_path(self.index_path),
      journal_path: self.journal.unwrap_or_else(default_journal_path),
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("recipes=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("recipes=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let config = args.into_config();
  config.validate()?;

  herald::info!("Starting Recipes REST Server v{}", env!("CARGO_PKG_VERSION"));
  herald::info!("Binding to address: {}", config.bind);

  start_server(config).await
}
