//! Filesystem storage backend.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

use super::traits::KeyValueStore;

/// Storage backend that keeps one file per key under a data directory.
///
/// Keys are sanitized into filenames, so `checkmind:checklists` lands at
/// `<data_dir>/checkmind-checklists.json`. A missing file reads as an
/// absent key.
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  /// Create a file store rooted at the given directory, creating it if
  /// needed. `None` uses the default data directory.
  pub fn open(dir: Option<PathBuf>) -> Result<Self> {
    let dir = super::data_dir(dir)?;

    std::fs::create_dir_all(&dir)
      .map_err(|e| eyre!("Failed to create data directory {}: {}", dir.display(), e))?;

    Ok(Self { dir })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    let name: String = key
      .chars()
      .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '-' })
      .collect();

    self.dir.join(format!("{}.json", name))
  }
}

#[async_trait]
impl KeyValueStore for FileStore {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    let path = self.path_for(key);

    match tokio::fs::read_to_string(&path).await {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(eyre!("Failed to read {}: {}", path.display(), e)),
    }
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    let path = self.path_for(key);

    tokio::fs::write(&path, value)
      .await
      .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let path = self.path_for(key);

    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(eyre!("Failed to remove {}: {}", path.display(), e)),
    }
  }
}
