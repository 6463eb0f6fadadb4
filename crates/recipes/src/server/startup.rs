//! REST server startup

use anyhow::{Context, Result};
use axum::serve;
use herald::journal::Journal;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::pipeline::RecipeService;
use crate::server::{create_router, AppState};

/// Start the REST server and run until Ctrl-C
pub async fn start_server(config: Config) -> Result<()> {
  let journal = Journal::open(&config.journal_path)
    .with_context(|| format!("Failed to open request journal {}", config.journal_path.display()))?;

  journal.info(&format!("Starting recipes REST server on {}", config.bind), "recipes-server").await;
  journal.info(&format!("Index mode: {}", config.index.describe()), "recipes-server").await;

  let service = RecipeService::from_config(&config)?;
  let app = create_router(AppState::new(service, journal.clone()));

  let listener = TcpListener::bind(config.bind)
    .await
    .with_context(|| format!("Failed to bind {}", config.bind))?;
  journal.info(&format!("Server listening on {}", config.bind), "recipes-server").await;

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      journal.info("Server shutdown gracefully", "recipes-server").await;
      Ok(())
    }
    Err(e) => {
      journal.error(&format!("Server error: {e}"), "recipes-server").await;
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    herald::warn!("Failed to listen for shutdown signal: {}", e);
  }
}
