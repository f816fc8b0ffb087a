//! CLI command definitions.

use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
  /// List all checklists with completion progress
  List,
  /// Show a single checklist and its items
  Show {
    /// Checklist id
    id: String,
  },
  /// Create a new checklist
  Create {
    /// Checklist title
    title: String,
  },
  /// Rename a checklist
  Rename {
    /// Checklist id
    id: String,
    /// New title
    title: String,
  },
  /// Delete a checklist and all its items
  Delete {
    /// Checklist id
    id: String,
  },
  /// Add an item to a checklist
  Add {
    /// Checklist id
    checklist_id: String,
    /// Item text
    text: String,
  },
  /// Toggle an item's completed flag
  Toggle {
    /// Checklist id
    checklist_id: String,
    /// Item id
    item_id: String,
  },
  /// Replace an item's text
  Edit {
    /// Checklist id
    checklist_id: String,
    /// Item id
    item_id: String,
    /// New text
    text: String,
  },
  /// Remove an item from a checklist
  Remove {
    /// Checklist id
    checklist_id: String,
    /// Item id
    item_id: String,
  },
  /// Delete all stored data
  Clear,
}
