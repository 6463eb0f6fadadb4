//! Typed spreadsheet rows and the records derived from them

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Row of the task feed
///
/// Every row names its journey; rows that also describe a method carry the
/// method's identifier in `Uniques`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskRow {
  #[serde(rename = "Journey Name (N)")]
  pub journey_name: String,

  #[serde(rename = "Uniques", default)]
  pub unique_id: Option<String>,

  #[serde(rename = "Description (short)", default)]
  pub description_short: String,

  #[serde(rename = "AI Response", default)]
  pub ai_response: String,
}

impl TaskRow {
  pub fn named(journey_name: &str) -> Self {
    Self {
      journey_name: journey_name.to_string(),
      unique_id: None,
      description_short: String::new(),
      ai_response: String::new(),
    }
  }

  /// Method described by this row, if it has an identifier
  pub fn method_record(&self) -> Option<MethodRecord> {
    self.unique_id.as_ref().map(|unique_id| MethodRecord {
      method: unique_id.clone(),
      description_short: self.description_short.clone(),
      ai_response: self.ai_response.clone(),
    })
  }
}

/// Row of the flow feed: one agenda step of a journey and the method it uses
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowRow {
  #[serde(rename = "Journey Name (N)")]
  pub journey_name: String,

  #[serde(rename = "Agenda Items (Description)")]
  pub agenda_item: String,

  #[serde(rename = "Methods (N)")]
  pub method_id: String,
}

/// Method details as returned to callers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct MethodRecord {
  /// Method identifier (`Uniques`)
  pub method: String,

  /// Short description of the method
  pub description_short: String,

  /// Canned AI response text for the method
  pub ai_response: String,
}

/// A journey with its agenda items and method identifiers in feed order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskRecord {
  pub journey_name: String,
  pub agenda_items: Vec<String>,
  pub method_ids: Vec<String>,
}

impl TaskRecord {
  /// Gather every flow row whose journey name equals `journey_name` exactly
  pub fn collect(journey_name: &str, flow_rows: &[FlowRow]) -> Self {
    let mut record = TaskRecord { journey_name: journey_name.to_string(), ..Default::default() };

    for row in flow_rows.iter().filter(|row| row.journey_name == journey_name) {
      record.agenda_items.push(row.agenda_item.clone());
      record.method_ids.push(row.method_id.clone());
    }

    record
  }
}
