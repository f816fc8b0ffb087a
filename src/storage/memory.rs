//! In-memory storage backend.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::KeyValueStore;

/// Storage backend that keeps values in a process-local map.
///
/// Nothing survives the process; used for ephemeral runs and tests.
#[derive(Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  /// Create an empty in-memory store.
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    Ok(entries.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_set_get_remove() {
    let store = MemoryStore::new();

    assert_eq!(store.get("k").await.unwrap(), None);

    store.set("k", "v1").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some("v1".to_string()));

    store.set("k", "v2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));

    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);

    // Removing again is fine
    store.remove("k").await.unwrap();
  }
}
