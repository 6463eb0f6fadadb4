use anyhow::Result;
use clap::{Parser, Subcommand};
use recipes::cli::client::{ClientConfig, RecipesClient};
use recipes::cli::commands;

#[derive(Parser)]
#[command(name = "recipes")]
#[command(about = "Recipes - ask a running recipes server for workflow suggestions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
  /// Base URL of the recipes server
  #[arg(long, global = true, env = "RECIPES_SERVER", default_value = "http://localhost:5000")]
  server: String,

  /// Request timeout in seconds
  #[arg(long, global = true, default_value = "120")]
  timeout_secs: u64,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Describe what you want to do and get a suggested recipe
  Ask {
    /// Free-text request (space-separated)
    #[arg(required = true)]
    text: Vec<String>,
  },
  /// Show server health and index state
  Status,
  /// Query the server's request journal
  Logs {
    /// Maximum number of log entries to return
    #[arg(short, long, default_value = "50")]
    limit: usize,
    /// Filter by log level (info, warn, error, success, all)
    #[arg(long, default_value = "all")]
    level: String,
  },
  /// Rebuild the server's persisted similarity index
  RebuildIndex,
}

async fn handle(client: &RecipesClient, command: Command) -> Result<()> {
  match command {
    Command::Ask { text } => commands::ask(client, &text).await,
    Command::Status => commands::status(client).await,
    Command::Logs { limit, level } => commands::logs(client, limit, &level).await,
    Command::RebuildIndex => commands::rebuild_index(client).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let client = RecipesClient::with_config(ClientConfig { base_url: cli.server, timeout_secs: cli.timeout_secs })?;

  handle(&client, cli.command).await
}
