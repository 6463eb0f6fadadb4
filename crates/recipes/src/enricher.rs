//! Agenda items and method details for a matched task

use crate::models::{FlowRow, MethodRecord, TaskRecord, TaskRow};

/// Result of looking one method identifier up in the task feed
#[derive(Debug, Clone, PartialEq)]
pub struct MethodLookup {
  /// Identifier as used for the lookup (trimmed)
  pub method: String,
  /// `None` when no task row carries this identifier
  pub record: Option<MethodRecord>,
}

/// Everything the responder needs about the matched task
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
  pub agenda_items: Vec<String>,
  pub lookups: Vec<MethodLookup>,
}

impl Enrichment {
  /// Methods that resolved, in flow order
  pub fn method_details(&self) -> Vec<MethodRecord> {
    self.lookups.iter().filter_map(|lookup| lookup.record.clone()).collect()
  }

  /// Identifiers that had no matching task row
  pub fn missing_methods(&self) -> Vec<&str> {
    self
      .lookups
      .iter()
      .filter(|lookup| lookup.record.is_none())
      .map(|lookup| lookup.method.as_str())
      .collect()
  }
}

/// First task row whose `Uniques` equals `method` exactly
pub fn lookup_method(method: &str, task_rows: &[TaskRow]) -> MethodLookup {
  let record = task_rows
    .iter()
    .find(|row| row.unique_id.as_deref() == Some(method))
    .and_then(TaskRow::method_record);

  MethodLookup { method: method.to_string(), record }
}

/// Collect the matched task's agenda items and resolve its methods
///
/// Returns `None` when the task has no agenda items or none of its methods
/// resolve against the task feed.
pub fn enrich(matched_name: &str, flow_rows: &[FlowRow], task_rows: &[TaskRow]) -> Option<Enrichment> {
  let task = TaskRecord::collect(matched_name, flow_rows);

  let lookups: Vec<MethodLookup> =
    task.method_ids.iter().map(|id| lookup_method(id.trim(), task_rows)).collect();

  let enrichment = Enrichment { agenda_items: task.agenda_items, lookups };

  let missing = enrichment.missing_methods();
  if !missing.is_empty() {
    herald::warn!(
      "{} method(s) of '{}' not found in task feed: {}",
      missing.len(),
      matched_name,
      missing.join(", ")
    );
  }

  if enrichment.agenda_items.is_empty() || enrichment.method_details().is_empty() {
    return None;
  }

  Some(enrichment)
}
