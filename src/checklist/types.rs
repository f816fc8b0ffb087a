//! Checklist domain types.
//!
//! The serialized form of these structs is the on-disk blob format: a JSON
//! array of checklists with camelCase field names.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// A single line entry within a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
  pub id: String,
  pub text: String,
  pub completed: bool,
}

/// A named, ordered collection of items with completion tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
  pub id: String,
  pub title: String,
  pub items: Vec<ChecklistItem>,
  pub created_at: String,
  pub updated_at: String,
}

impl Checklist {
  /// Count of completed items and total items, for progress display.
  pub fn progress(&self) -> (usize, usize) {
    let done = self.items.iter().filter(|i| i.completed).count();
    (done, self.items.len())
  }
}

/// Partial update for a checklist. `Some` fields overwrite; `id` and
/// `created_at` are never updatable.
#[derive(Debug, Clone, Default)]
pub struct ChecklistUpdate {
  pub title: Option<String>,
  pub items: Option<Vec<ChecklistItem>>,
}

impl ChecklistUpdate {
  /// Update that replaces the title only.
  pub fn title(title: impl Into<String>) -> Self {
    Self {
      title: Some(title.into()),
      ..Self::default()
    }
  }
}

/// Partial update for a checklist item. The item id is never updatable.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
  pub text: Option<String>,
  pub completed: Option<bool>,
}

impl ItemUpdate {
  /// Update that replaces the text only.
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      ..Self::default()
    }
  }

  /// Update that sets the completed flag only.
  pub fn completed(completed: bool) -> Self {
    Self {
      completed: Some(completed),
      ..Self::default()
    }
  }
}

/// Current time as an ISO 8601 string with millisecond precision.
pub fn now_iso() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a unique time-based identifier.
///
/// Identifiers are millisecond timestamps rendered as strings. When two
/// calls land on the same millisecond the later one is bumped past the
/// previous, so ids stay unique and strictly increasing process-wide.
pub fn generate_id() -> String {
  let now = Utc::now().timestamp_millis();

  loop {
    let last = LAST_ID.load(Ordering::SeqCst);
    let id = last.max(now - 1) + 1;
    if LAST_ID
      .compare_exchange(last, id, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
    {
      return id.to_string();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_generated_ids_are_unique_and_increasing() {
    let ids: Vec<i64> = (0..200).map(|_| generate_id().parse().unwrap()).collect();

    for pair in ids.windows(2) {
      assert!(pair[1] > pair[0], "{} should be greater than {}", pair[1], pair[0]);
    }
  }

  #[test]
  fn test_checklist_serializes_with_camel_case_fields() {
    let checklist = Checklist {
      id: "1".to_string(),
      title: "Groceries".to_string(),
      items: vec![ChecklistItem {
        id: "2".to_string(),
        text: "Milk".to_string(),
        completed: false,
      }],
      created_at: "2024-01-01T00:00:00.000Z".to_string(),
      updated_at: "2024-01-01T00:00:00.000Z".to_string(),
    };

    let json = serde_json::to_string(&checklist).unwrap();
    assert!(json.contains("\"createdAt\""));
    assert!(json.contains("\"updatedAt\""));
    assert!(json.contains("\"completed\":false"));

    let back: Checklist = serde_json::from_str(&json).unwrap();
    assert_eq!(back, checklist);
  }

  #[test]
  fn test_now_iso_has_millisecond_utc_format() {
    let ts = now_iso();
    // e.g. 2024-01-01T00:00:00.000Z
    assert!(ts.ends_with('Z'));
    assert_eq!(ts.len(), 24);
  }
}
