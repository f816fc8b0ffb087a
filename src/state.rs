//! In-memory state synchronized with checklist persistence.
//!
//! `ChecklistState` is the surface presentation code talks to. It holds a
//! cached copy of the persisted collection, a loading flag, and an error
//! indicator. The initial load runs as a background task and is drained via
//! `poll()` from the caller's event loop; every mutation goes through the
//! persistence service first and, on success, patches the cache in place so
//! its shape matches what `load_all()` would now return. On failure the
//! cache is left untouched and the failure is reported to the caller.

use tokio::sync::mpsc;
use tracing::warn;

use crate::checklist::{
  now_iso, Checklist, ChecklistItem, ChecklistService, ChecklistUpdate, ItemUpdate,
};
use crate::storage::KeyValueStore;

/// State container for the checklist collection.
///
/// Owned by the composition root and handed to presentation code; call
/// `init()` once at startup and `poll()` from the event loop until the
/// initial load lands.
pub struct ChecklistState<S: KeyValueStore + 'static> {
  service: ChecklistService<S>,
  checklists: Vec<Checklist>,
  loading: bool,
  error: Option<String>,
  receiver: Option<mpsc::UnboundedReceiver<Vec<Checklist>>>,
}

impl<S: KeyValueStore + 'static> ChecklistState<S> {
  /// Create a state container over the given service. The cache starts
  /// empty; nothing is loaded until `init()`.
  pub fn new(service: ChecklistService<S>) -> Self {
    Self {
      service,
      checklists: Vec::new(),
      loading: false,
      error: None,
      receiver: None,
    }
  }

  /// Start the initial background load. No-op if a load is already running.
  pub fn init(&mut self) {
    if self.loading {
      return;
    }
    self.start_load();
  }

  /// Reload the collection from storage, replacing any pending load.
  #[allow(dead_code)]
  pub fn refresh(&mut self) {
    self.receiver = None;
    self.start_load();
  }

  fn start_load(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.loading = true;
    self.error = None;

    let service = self.service.clone();
    tokio::spawn(async move {
      // Ignore send errors - receiver may have been dropped by refresh()
      let _ = tx.send(service.load_all().await);
    });
  }

  /// Poll for the result of a pending load.
  ///
  /// Returns `true` if the cache changed (the load landed or was lost).
  /// Call this from the event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(checklists) => {
        self.checklists = checklists;
        self.loading = false;
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        warn!("Checklist load task dropped before sending");
        self.error = Some("Failed to load checklists".to_string());
        self.loading = false;
        self.receiver = None;
        true
      }
    }
  }

  /// The cached collection. Empty until the initial load lands.
  pub fn checklists(&self) -> &[Checklist] {
    &self.checklists
  }

  /// Whether the initial (or a refreshed) load is still outstanding.
  pub fn loading(&self) -> bool {
    self.loading
  }

  /// The last load error, if any.
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Look up a cached checklist by id. Never touches storage.
  pub fn get_checklist(&self, id: &str) -> Option<&Checklist> {
    self.checklists.iter().find(|c| c.id == id)
  }

  /// Create a checklist and prepend it to the cache.
  pub async fn create_checklist(&mut self, title: &str) -> Option<Checklist> {
    let created = self.service.create(title).await?;
    self.checklists.insert(0, created.clone());
    Some(created)
  }

  /// Update a checklist and patch the cached entry to match.
  pub async fn update_checklist(&mut self, id: &str, updates: ChecklistUpdate) -> bool {
    if !self.service.update(id, updates.clone()).await {
      return false;
    }

    if let Some(checklist) = self.checklists.iter_mut().find(|c| c.id == id) {
      if let Some(title) = updates.title {
        checklist.title = title;
      }
      if let Some(items) = updates.items {
        checklist.items = items;
      }
      checklist.updated_at = now_iso();
    }
    true
  }

  /// Delete a checklist and drop it from the cache.
  pub async fn delete_checklist(&mut self, id: &str) -> bool {
    if !self.service.delete(id).await {
      return false;
    }

    self.checklists.retain(|c| c.id != id);
    true
  }

  /// Add an item and append it to the cached parent.
  pub async fn add_item(&mut self, checklist_id: &str, text: &str) -> Option<ChecklistItem> {
    let item = self.service.add_item(checklist_id, text).await?;

    if let Some(checklist) = self.checklists.iter_mut().find(|c| c.id == checklist_id) {
      checklist.items.push(item.clone());
      checklist.updated_at = now_iso();
    }
    Some(item)
  }

  /// Update an item and patch the cached copy to match.
  pub async fn update_item(
    &mut self,
    checklist_id: &str,
    item_id: &str,
    updates: ItemUpdate,
  ) -> bool {
    if !self.service.update_item(checklist_id, item_id, updates.clone()).await {
      return false;
    }

    if let Some(checklist) = self.checklists.iter_mut().find(|c| c.id == checklist_id) {
      if let Some(item) = checklist.items.iter_mut().find(|i| i.id == item_id) {
        if let Some(text) = updates.text {
          item.text = text;
        }
        if let Some(completed) = updates.completed {
          item.completed = completed;
        }
      }
      checklist.updated_at = now_iso();
    }
    true
  }

  /// Delete an item and drop it from the cached parent.
  pub async fn delete_item(&mut self, checklist_id: &str, item_id: &str) -> bool {
    if !self.service.delete_item(checklist_id, item_id).await {
      return false;
    }

    if let Some(checklist) = self.checklists.iter_mut().find(|c| c.id == checklist_id) {
      checklist.items.retain(|i| i.id != item_id);
      checklist.updated_at = now_iso();
    }
    true
  }

  /// Flip an item's completed flag.
  ///
  /// The current value is read from the cache, not re-read from storage, so
  /// a toggle against a stale cache flips the cached value.
  pub async fn toggle_item(&mut self, checklist_id: &str, item_id: &str) -> bool {
    let completed = match self
      .get_checklist(checklist_id)
      .and_then(|c| c.items.iter().find(|i| i.id == item_id))
    {
      Some(item) => item.completed,
      None => return false,
    };

    self
      .update_item(checklist_id, item_id, ItemUpdate::completed(!completed))
      .await
  }

  /// Drop all stored data and empty the cache.
  pub async fn clear(&mut self) -> bool {
    if !self.service.clear_all().await {
      return false;
    }

    self.checklists.clear();
    true
  }
}
