//! Checklist persistence over a key-value store.
//!
//! The whole collection lives as one serialized JSON array under a single
//! key, and every mutation is a full load-mutate-save cycle against it.
//! That is fine at checklist scale (the collection fits in memory and a save
//! rewrites a few kilobytes) and keeps the storage contract to get/set/remove.
//!
//! Known limitation: there is no locking. Two mutations with overlapping
//! await windows each read the collection independently and each write back
//! their own full copy, so the second write wins. The expected caller is a
//! single-user session issuing one mutation at a time.

use std::sync::Arc;
use tracing::{debug, error};

use crate::storage::KeyValueStore;

use super::types::{
  generate_id, now_iso, Checklist, ChecklistItem, ChecklistUpdate, ItemUpdate,
};

/// The single key the collection is stored under.
pub const STORAGE_KEY: &str = "checkmind:checklists";

/// Persistence service for the checklist collection.
///
/// Every operation resolves to a definite success/failure value; storage and
/// parse errors are logged here and never propagate to the caller.
pub struct ChecklistService<S: KeyValueStore> {
  store: Arc<S>,
}

impl<S: KeyValueStore> ChecklistService<S> {
  /// Create a service backed by the given store.
  pub fn new(store: S) -> Self {
    Self {
      store: Arc::new(store),
    }
  }

  /// Load the full collection.
  ///
  /// An absent blob is an empty collection. Read and parse errors are also
  /// treated as empty: surfacing them would brick the UI over a corrupt
  /// blob, and the next successful save rewrites it wholesale anyway.
  pub async fn load_all(&self) -> Vec<Checklist> {
    match self.store.get(STORAGE_KEY).await {
      Ok(Some(data)) => match serde_json::from_str(&data) {
        Ok(checklists) => checklists,
        Err(e) => {
          error!("Failed to parse stored checklists: {}", e);
          Vec::new()
        }
      },
      Ok(None) => Vec::new(),
      Err(e) => {
        error!("Failed to load checklists: {}", e);
        Vec::new()
      }
    }
  }

  /// Serialize and overwrite the full collection.
  pub async fn save_all(&self, checklists: &[Checklist]) -> bool {
    let data = match serde_json::to_string(checklists) {
      Ok(data) => data,
      Err(e) => {
        error!("Failed to serialize checklists: {}", e);
        return false;
      }
    };

    match self.store.set(STORAGE_KEY, &data).await {
      Ok(()) => {
        debug!("Saved {} checklists", checklists.len());
        true
      }
      Err(e) => {
        error!("Failed to save checklists: {}", e);
        false
      }
    }
  }

  /// Create a new checklist and prepend it to the collection.
  ///
  /// Returns the new entity only if the save succeeded.
  pub async fn create(&self, title: &str) -> Option<Checklist> {
    let mut checklists = self.load_all().await;
    let now = now_iso();

    let checklist = Checklist {
      id: generate_id(),
      title: title.to_string(),
      items: Vec::new(),
      created_at: now.clone(),
      updated_at: now,
    };

    checklists.insert(0, checklist.clone());

    if self.save_all(&checklists).await {
      Some(checklist)
    } else {
      None
    }
  }

  /// Merge the provided fields onto an existing checklist.
  ///
  /// Returns `false` if the checklist does not exist or the save failed.
  pub async fn update(&self, id: &str, updates: ChecklistUpdate) -> bool {
    let mut checklists = self.load_all().await;

    let checklist = match checklists.iter_mut().find(|c| c.id == id) {
      Some(checklist) => checklist,
      None => return false,
    };

    if let Some(title) = updates.title {
      checklist.title = title;
    }
    if let Some(items) = updates.items {
      checklist.items = items;
    }
    checklist.updated_at = now_iso();

    self.save_all(&checklists).await
  }

  /// Remove a checklist and all its items.
  ///
  /// Deleting an absent id is a no-op that still reports success.
  pub async fn delete(&self, id: &str) -> bool {
    let mut checklists = self.load_all().await;
    checklists.retain(|c| c.id != id);

    self.save_all(&checklists).await
  }

  /// Load a single checklist by id straight from storage.
  #[allow(dead_code)]
  pub async fn get(&self, id: &str) -> Option<Checklist> {
    self.load_all().await.into_iter().find(|c| c.id == id)
  }

  /// Append a new item to a checklist.
  ///
  /// Returns the new item only if the parent exists and the save succeeded.
  pub async fn add_item(&self, checklist_id: &str, text: &str) -> Option<ChecklistItem> {
    let mut checklists = self.load_all().await;

    let checklist = checklists.iter_mut().find(|c| c.id == checklist_id)?;

    let item = ChecklistItem {
      id: generate_id(),
      text: text.to_string(),
      completed: false,
    };

    checklist.items.push(item.clone());
    checklist.updated_at = now_iso();

    if self.save_all(&checklists).await {
      Some(item)
    } else {
      None
    }
  }

  /// Merge the provided fields onto an existing item.
  ///
  /// Returns `false` if the checklist or the item does not exist, or the
  /// save failed.
  pub async fn update_item(
    &self,
    checklist_id: &str,
    item_id: &str,
    updates: ItemUpdate,
  ) -> bool {
    let mut checklists = self.load_all().await;

    let checklist = match checklists.iter_mut().find(|c| c.id == checklist_id) {
      Some(checklist) => checklist,
      None => return false,
    };
    let item = match checklist.items.iter_mut().find(|i| i.id == item_id) {
      Some(item) => item,
      None => return false,
    };

    if let Some(text) = updates.text {
      item.text = text;
    }
    if let Some(completed) = updates.completed {
      item.completed = completed;
    }
    checklist.updated_at = now_iso();

    self.save_all(&checklists).await
  }

  /// Remove an item from a checklist.
  ///
  /// Removing an absent item is a no-op on the item sequence, but still
  /// touches the parent and reports success.
  pub async fn delete_item(&self, checklist_id: &str, item_id: &str) -> bool {
    let mut checklists = self.load_all().await;

    let checklist = match checklists.iter_mut().find(|c| c.id == checklist_id) {
      Some(checklist) => checklist,
      None => return false,
    };

    checklist.items.retain(|i| i.id != item_id);
    checklist.updated_at = now_iso();

    self.save_all(&checklists).await
  }

  /// Drop the stored collection entirely.
  pub async fn clear_all(&self) -> bool {
    match self.store.remove(STORAGE_KEY).await {
      Ok(()) => true,
      Err(e) => {
        error!("Failed to clear checklists: {}", e);
        false
      }
    }
  }
}

impl<S: KeyValueStore> Clone for ChecklistService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;
  use std::time::Duration;

  fn service() -> ChecklistService<MemoryStore> {
    ChecklistService::new(MemoryStore::new())
  }

  #[tokio::test]
  async fn test_create_then_load() {
    let service = service();

    let created = service.create("Groceries").await.unwrap();
    assert_eq!(created.title, "Groceries");
    assert!(created.items.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let loaded = service.load_all().await;
    assert_eq!(loaded, vec![created]);
  }

  #[tokio::test]
  async fn test_create_prepends() {
    let service = service();

    let first = service.create("First").await.unwrap();
    let second = service.create("Second").await.unwrap();

    let titles: Vec<String> = service
      .load_all()
      .await
      .into_iter()
      .map(|c| c.title)
      .collect();
    assert_eq!(titles, vec!["Second", "First"]);
    assert_ne!(first.id, second.id);
  }

  #[tokio::test]
  async fn test_update_merges_fields_and_bumps_updated_at() {
    let service = service();
    let created = service.create("Groceries").await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    assert!(service.update(&created.id, ChecklistUpdate::title("Errands")).await);

    let updated = service.get(&created.id).await.unwrap();
    assert_eq!(updated.title, "Errands");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
  }

  #[tokio::test]
  async fn test_update_unknown_id_fails_and_leaves_storage_unchanged() {
    let service = service();
    service.create("Groceries").await.unwrap();
    let before = service.load_all().await;

    assert!(!service.update("no-such-id", ChecklistUpdate::title("x")).await);
    assert_eq!(service.load_all().await, before);
  }

  #[tokio::test]
  async fn test_delete_is_idempotent() {
    let service = service();
    let created = service.create("Groceries").await.unwrap();

    assert!(service.delete(&created.id).await);
    assert!(service.delete(&created.id).await);
    assert!(service.load_all().await.is_empty());
  }

  #[tokio::test]
  async fn test_add_then_delete_item_round_trips() {
    let service = service();
    let checklist = service.create("Groceries").await.unwrap();

    let item = service.add_item(&checklist.id, "Milk").await.unwrap();
    assert_eq!(item.text, "Milk");
    assert!(!item.completed);

    assert!(service.delete_item(&checklist.id, &item.id).await);
    let after = service.get(&checklist.id).await.unwrap();
    assert!(after.items.is_empty());
  }

  #[tokio::test]
  async fn test_add_item_to_unknown_checklist_fails() {
    let service = service();
    assert!(service.add_item("no-such-id", "Milk").await.is_none());
  }

  #[tokio::test]
  async fn test_update_item_unknown_item_fails() {
    let service = service();
    let checklist = service.create("Groceries").await.unwrap();

    assert!(
      !service
        .update_item(&checklist.id, "no-such-item", ItemUpdate::completed(true))
        .await
    );
  }

  #[tokio::test]
  async fn test_delete_absent_item_still_succeeds_and_touches_parent() {
    let service = service();
    let checklist = service.create("Groceries").await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    assert!(service.delete_item(&checklist.id, "no-such-item").await);
    let after = service.get(&checklist.id).await.unwrap();
    assert!(after.updated_at > checklist.updated_at);
  }

  #[tokio::test]
  async fn test_full_scenario() {
    let service = service();
    assert!(service.load_all().await.is_empty());

    let checklist = service.create("Groceries").await.unwrap();
    assert!(checklist.items.is_empty());

    let item = service.add_item(&checklist.id, "Milk").await.unwrap();
    assert_eq!(item.text, "Milk");
    assert!(!item.completed);

    assert!(
      service
        .update_item(&checklist.id, &item.id, ItemUpdate::completed(true))
        .await
    );
    let reloaded = service.get(&checklist.id).await.unwrap();
    assert!(reloaded.items[0].completed);

    assert!(service.delete(&checklist.id).await);
    assert!(service.load_all().await.is_empty());
  }

  #[tokio::test]
  async fn test_corrupt_blob_loads_as_empty() {
    let store = MemoryStore::new();
    store.set(STORAGE_KEY, "not json").await.unwrap();
    let service = ChecklistService::new(store);

    assert!(service.load_all().await.is_empty());
  }

  #[tokio::test]
  async fn test_clear_all_drops_everything() {
    let service = service();
    service.create("Groceries").await.unwrap();

    assert!(service.clear_all().await);
    assert!(service.load_all().await.is_empty());
  }
}
