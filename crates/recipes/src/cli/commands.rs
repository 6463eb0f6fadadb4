use anyhow::Result;
use colored::*;

use crate::cli::client::RecipesClient;
use crate::cli::display::{display_recipe, format_log_entry};

/// Ask for a recipe suggestion
pub async fn ask(client: &RecipesClient, words: &[String]) -> Result<()> {
  let recipe_name = words.join(" ");
  let recipe = client.get_recipe(&recipe_name).await?;
  display_recipe(&recipe);
  Ok(())
}

pub async fn status(client: &RecipesClient) -> Result<()> {
  let status = client.status().await?;

  println!("{} Server is {}", "✓".green(), status.status.green());
  println!("  Index: {}", status.index_mode.cyan());
  match (status.index_building, status.indexed_tasks) {
    (true, _) => println!("  Indexed tasks: {}", "building".yellow()),
    (false, Some(count)) => println!("  Indexed tasks: {}", count.to_string().yellow()),
    (false, None) => println!("  Indexed tasks: {}", "not loaded".dimmed()),
  }
  Ok(())
}

/// Query the server's request journal
pub async fn logs(client: &RecipesClient, limit: usize, level: &str) -> Result<()> {
  let response = client.logs(limit, level).await?;

  if response.logs.is_empty() {
    println!("No log entries found.");
    return Ok(());
  }

  for entry in &response.logs {
    println!("{}", format_log_entry(entry));
  }
  Ok(())
}

pub async fn rebuild_index(client: &RecipesClient) -> Result<()> {
  let response = client.rebuild_index().await?;
  println!("{} Rebuilt index with {} tasks", "✓".green(), response.indexed_tasks.to_string().yellow());
  Ok(())
}
