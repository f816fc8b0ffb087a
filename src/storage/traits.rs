//! The storage contract all backends implement.

use async_trait::async_trait;
use color_eyre::Result;

/// Asynchronous key-value store.
///
/// The persistence layer keeps the whole checklist collection as one
/// serialized value under one key, so this is deliberately the narrowest
/// contract that supports it. Implementors must be shareable across tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
  /// Read the value stored under `key`, or `None` if the key is absent.
  async fn get(&self, key: &str) -> Result<Option<String>>;

  /// Store `value` under `key`, overwriting any previous value.
  async fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Remove `key`. Removing an absent key is not an error.
  async fn remove(&self, key: &str) -> Result<()>;
}
