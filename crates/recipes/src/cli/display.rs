//! Display formatting utilities for CLI output

use colored::*;
use herald::journal::JournalEntry;

use crate::server::types::RecipeResponse;

const WRAP_WIDTH: usize = 80;

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current_line));
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

/// Print a recipe suggestion with its match details
pub fn display_recipe(recipe: &RecipeResponse) {
  for line in wrap_text(recipe.response.trim(), WRAP_WIDTH) {
    println!("{line}");
  }
  println!();

  let details = &recipe.details;
  println!("{} {}", "Closest task:".bold(), details.closest_task.cyan());
  println!("{} {}", "Similarity:  ".bold(), details.similarity.dimmed());

  if details.method_details.is_empty() {
    return;
  }

  println!("{}", "Methods:".bold());
  for method in &details.method_details {
    println!("  {} {}", "•".yellow(), method.method.bold());
    for line in wrap_text(&method.description_short, WRAP_WIDTH - 4) {
      println!("    {}", line.dimmed());
    }
  }
}

/// One journal entry as a single colored line
pub fn format_log_entry(entry: &JournalEntry) -> String {
  let level = match entry.level.as_str() {
    "error" => entry.level.red(),
    "warn" => entry.level.yellow(),
    "success" => entry.level.green(),
    _ => entry.level.blue(),
  };

  let status = entry
    .context
    .as_ref()
    .and_then(|context| context.status_code)
    .map(|code| format!(" ({code})"))
    .unwrap_or_default();

  format!(
    "{} [{}] {}: {}{}",
    entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
    level,
    entry.component.cyan(),
    entry.message,
    status
  )
}
