//! Key-value storage backends for checklist persistence.
//!
//! This module provides a backend-agnostic storage contract that:
//! - Exposes string values under string keys, nothing more
//! - Treats a missing key as an ordinary absent read, not an error
//! - Ships three interchangeable backends: in-memory, filesystem, SQLite

mod file;
mod memory;
mod sqlite;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

/// Resolve the data directory used by the persistent backends.
///
/// Uses the platform data directory (falling back to `~/.local/share`),
/// namespaced under `checkmind`. An explicit override wins.
pub fn data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
  if let Some(dir) = explicit {
    return Ok(dir);
  }

  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("checkmind"))
}
