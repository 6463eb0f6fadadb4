//! Exact nearest-neighbor index over task-name embeddings
//!
//! Vectors are kept as one `ndarray` matrix (one row per distinct journey
//! name) and searched by brute-force Euclidean distance, so results are exact.
//! Snapshots are written wholesale as JSON and tagged with the embedding
//! model that produced them.

use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{IndexError, RecipeError};
use crate::models::TaskRow;
use crate::providers::EmbeddingProvider;

const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// In-memory similarity index
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
  model: String,
  names: Vec<String>,
  vectors: Array2<f32>,
}

impl SimilarityIndex {
  /// An index with no entries
  pub fn empty(model: &str) -> Self {
    Self { model: model.to_string(), names: Vec::new(), vectors: Array2::zeros((0, 0)) }
  }

  /// Build from parallel name/vector lists; all vectors must share one dimension
  pub fn from_entries(
    model: &str,
    names: Vec<String>,
    vectors: Vec<Vec<f32>>,
  ) -> Result<Self, IndexError> {
    if names.len() != vectors.len() {
      return Err(IndexError::Corrupt {
        path: "<memory>".to_string(),
        message: format!("{} names for {} vectors", names.len(), vectors.len()),
      });
    }

    let Some(first) = vectors.first() else {
      return Ok(Self::empty(model));
    };

    let dimension = first.len();
    let mut flat = Vec::with_capacity(vectors.len() * dimension);
    for vector in &vectors {
      if vector.len() != dimension {
        return Err(IndexError::DimensionMismatch { expected: dimension, actual: vector.len() });
      }
      flat.extend_from_slice(vector);
    }

    let vectors = Array2::from_shape_vec((names.len(), dimension), flat).map_err(|e| {
      IndexError::Corrupt { path: "<memory>".to_string(), message: e.to_string() }
    })?;

    Ok(Self { model: model.to_string(), names, vectors })
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Vector dimension, zero for an empty index
  pub fn dimension(&self) -> usize {
    self.vectors.ncols()
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn vector(&self, position: usize) -> Option<ArrayView1<'_, f32>> {
    (position < self.len()).then(|| self.vectors.row(position))
  }

  /// Position and Euclidean distance of the closest entry; ties go to the earliest entry
  pub fn nearest(&self, query: &[f32]) -> Result<Option<(usize, f32)>, IndexError> {
    if self.is_empty() {
      return Ok(None);
    }
    if query.len() != self.dimension() {
      return Err(IndexError::DimensionMismatch { expected: self.dimension(), actual: query.len() });
    }

    let query = ArrayView1::from(query);
    let distances = (&self.vectors - &query).mapv(|x| x * x).sum_axis(Axis(1)).mapv(f32::sqrt);

    let best = distances
      .iter()
      .copied()
      .enumerate()
      .fold(None, |best: Option<(usize, f32)>, (position, distance)| match best {
        Some((_, best_distance)) if best_distance <= distance => best,
        _ => Some((position, distance)),
      });

    Ok(best)
  }
}

/// Embed each distinct journey name (first occurrence order) into a fresh index
pub async fn build_index(
  embedder: &dyn EmbeddingProvider,
  task_rows: &[TaskRow],
) -> Result<SimilarityIndex, RecipeError> {
  let mut seen = HashSet::new();
  let names: Vec<String> = task_rows
    .iter()
    .filter(|row| seen.insert(row.journey_name.as_str()))
    .map(|row| row.journey_name.clone())
    .collect();

  if names.is_empty() {
    return Ok(SimilarityIndex::empty(embedder.model()));
  }

  let vectors = embedder.embed_documents(&names).await?;
  debug!(tasks = names.len(), model = embedder.model(), "index built");
  Ok(SimilarityIndex::from_entries(embedder.model(), names, vectors)?)
}

// Persistence
// ===========

#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
  format_version: u32,
  model: String,
  dimension: usize,
  created_at: DateTime<Utc>,
  entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
  journey_name: String,
  vector: Vec<f32>,
}

fn io_error(path: &Path, source: std::io::Error) -> IndexError {
  IndexError::Io { path: path.display().to_string(), source }
}

fn corrupt(path: &Path, message: impl Into<String>) -> IndexError {
  IndexError::Corrupt { path: path.display().to_string(), message: message.into() }
}

fn temporary_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Write the whole index to `path`, replacing any previous snapshot atomically
pub fn save_index(index: &SimilarityIndex, path: &Path) -> Result<(), IndexError> {
  let snapshot = IndexSnapshot {
    format_version: SNAPSHOT_FORMAT_VERSION,
    model: index.model.clone(),
    dimension: index.dimension(),
    created_at: Utc::now(),
    entries: index
      .names
      .iter()
      .zip(index.vectors.rows())
      .map(|(name, row)| SnapshotEntry { journey_name: name.clone(), vector: row.to_vec() })
      .collect(),
  };

  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
  }

  let bytes = serde_json::to_vec(&snapshot).map_err(|e| corrupt(path, e.to_string()))?;
  let temporary = temporary_path(path);
  fs::write(&temporary, bytes).map_err(|e| io_error(&temporary, e))?;
  fs::rename(&temporary, path).map_err(|e| io_error(path, e))?;

  debug!(path = %path.display(), entries = index.len(), "index snapshot saved");
  Ok(())
}

/// Load a snapshot if one exists for `model`
///
/// Returns `None` when the file is absent or was produced by a different
/// embedding model (its vectors would not be comparable to fresh queries).
pub fn load_index_if_present(path: &Path, model: &str) -> Result<Option<SimilarityIndex>, IndexError> {
  if !path.exists() {
    return Ok(None);
  }

  let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
  let snapshot: IndexSnapshot =
    serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e.to_string()))?;

  if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
    return Err(corrupt(path, format!("unsupported format version {}", snapshot.format_version)));
  }

  if snapshot.model != model {
    herald::warn!(
      "Ignoring index snapshot {} built with model '{}' (configured: '{}')",
      path.display(),
      snapshot.model,
      model
    );
    return Ok(None);
  }

  let (names, vectors): (Vec<_>, Vec<_>) =
    snapshot.entries.into_iter().map(|e| (e.journey_name, e.vector)).unzip();

  if vectors.iter().any(|v| v.len() != snapshot.dimension) {
    return Err(corrupt(path, "entry dimension disagrees with snapshot header"));
  }

  let index = SimilarityIndex::from_entries(&snapshot.model, names, vectors)
    .map_err(|e| corrupt(path, e.to_string()))?;
  Ok(Some(index))
}
