//! Persistent request journal
//!
//! Append-only JSONL storage for server events with:
//! - optional per-request context (id, method, path, status, duration)
//! - async-safe appends behind an internal lock
//! - console echo through the leveled loggers unless silenced

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[cfg(feature = "schemars")]
use schemars::JsonSchema;

use crate::Level;

// Types
// =====

/// Request context attached to a journal entry
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct EntryContext {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One line of the journal
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct JournalEntry {
  pub timestamp: DateTime<Utc>,
  pub level: String,
  pub message: String,
  pub component: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<EntryContext>,
}

struct JournalFile {
  path: PathBuf,
  silent: bool,
}

/// Thread-safe JSONL journal; cloning shares the same file and lock
#[derive(Clone)]
pub struct Journal {
  inner: Arc<Mutex<JournalFile>>,
}

// File operations
// ===============

impl JournalFile {
  fn open(path: &Path, silent: bool) -> std::io::Result<Self> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }

    // Create but never truncate
    if !path.exists() {
      File::create(path)?;
    }

    Ok(Self { path: path.to_path_buf(), silent })
  }

  fn append(&self, entry: &JournalEntry) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  /// Most recent `limit` entries matching `level`, oldest first
  fn read(&self, limit: Option<usize>, level: Option<&str>) -> std::io::Result<Vec<JournalEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = Vec::new();

    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      // Malformed lines are skipped
      let Ok(entry) = serde_json::from_str::<JournalEntry>(&line) else {
        continue;
      };

      if level.is_none_or(|filter| filter == "all" || entry.level == filter) {
        entries.push(entry);
      }
    }

    if let Some(limit) = limit {
      let skip = entries.len().saturating_sub(limit);
      entries.drain(..skip);
    }

    Ok(entries)
  }
}

// Core API
// ========

impl Journal {
  /// Open (or create) the journal at `path`, echoing entries to the console
  pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
    Self::open_with_silent(path, false)
  }

  /// Open the journal, optionally without console echo
  pub fn open_with_silent<P: AsRef<Path>>(path: P, silent: bool) -> std::io::Result<Self> {
    let file = JournalFile::open(path.as_ref(), silent)?;
    Ok(Self { inner: Arc::new(Mutex::new(file)) })
  }

  /// Append an entry
  pub async fn record(
    &self,
    level: Level,
    message: &str,
    component: &str,
    context: Option<EntryContext>,
  ) -> std::io::Result<()> {
    let entry = JournalEntry {
      timestamp: Utc::now(),
      level: level.as_str().to_string(),
      message: message.to_string(),
      component: component.to_string(),
      context,
    };

    let guard = self.inner.lock().await;
    guard.append(&entry)?;
    if !guard.silent {
      crate::emit(level, message);
    }
    Ok(())
  }

  /// Append an entry, ignoring write failures
  pub async fn log(&self, level: Level, message: &str, component: &str, context: Option<EntryContext>) {
    let _ = self.record(level, message, component, context).await;
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component, None).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component, None).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component, None).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component, None).await;
  }

  /// Read back entries, newest `limit` kept, `level` of `None` or `"all"` matches everything
  pub async fn entries(
    &self,
    limit: Option<usize>,
    level: Option<&str>,
  ) -> std::io::Result<Vec<JournalEntry>> {
    let guard = self.inner.lock().await;
    guard.read(limit, level)
  }

  pub async fn path(&self) -> PathBuf {
    self.inner.lock().await.path.clone()
  }
}
