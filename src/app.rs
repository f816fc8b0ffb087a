//! Composition root for one CLI invocation.

use color_eyre::{eyre::eyre, Result};
use std::time::Duration;

use crate::checklist::{ChecklistService, ChecklistUpdate, ItemUpdate};
use crate::commands::Command;
use crate::state::ChecklistState;
use crate::storage::KeyValueStore;

/// The application: owns the state container, executes one command against
/// it, and prints the result.
pub struct App<S: KeyValueStore + 'static> {
  state: ChecklistState<S>,
}

impl<S: KeyValueStore + 'static> App<S> {
  /// Build the app over the given store and drive the initial load to
  /// completion.
  pub async fn new(store: S) -> Result<Self> {
    let service = ChecklistService::new(store);
    let mut state = ChecklistState::new(service);
    state.init();

    while state.loading() {
      if !state.poll() {
        tokio::time::sleep(Duration::from_millis(10)).await;
      }
    }

    if let Some(error) = state.error() {
      return Err(eyre!("{}", error));
    }

    Ok(Self { state })
  }

  /// Execute a single command.
  pub async fn run(&mut self, command: Command) -> Result<()> {
    match command {
      Command::List => self.list(),
      Command::Show { id } => self.show(&id),
      Command::Create { title } => self.create(&title).await,
      Command::Rename { id, title } => self.rename(&id, &title).await,
      Command::Delete { id } => self.delete(&id).await,
      Command::Add { checklist_id, text } => self.add(&checklist_id, &text).await,
      Command::Toggle { checklist_id, item_id } => self.toggle(&checklist_id, &item_id).await,
      Command::Edit {
        checklist_id,
        item_id,
        text,
      } => self.edit(&checklist_id, &item_id, &text).await,
      Command::Remove { checklist_id, item_id } => self.remove(&checklist_id, &item_id).await,
      Command::Clear => self.clear().await,
    }
  }

  fn list(&self) -> Result<()> {
    if self.state.checklists().is_empty() {
      println!("No checklists yet. Create one with `checkmind create <title>`.");
      return Ok(());
    }

    for checklist in self.state.checklists() {
      let (done, total) = checklist.progress();
      println!("{}  {}  ({}/{} done)", checklist.id, checklist.title, done, total);
    }
    Ok(())
  }

  fn show(&self, id: &str) -> Result<()> {
    let checklist = self
      .state
      .get_checklist(id)
      .ok_or_else(|| eyre!("Checklist not found: {}", id))?;

    let (done, total) = checklist.progress();
    println!("{}  ({}/{} done)", checklist.title, done, total);
    for item in &checklist.items {
      let mark = if item.completed { "x" } else { " " };
      println!("  [{}] {}  {}", mark, item.id, item.text);
    }
    Ok(())
  }

  async fn create(&mut self, title: &str) -> Result<()> {
    let title = validate(title, "Title")?;

    match self.state.create_checklist(&title).await {
      Some(checklist) => {
        println!("Created checklist {}", checklist.id);
        Ok(())
      }
      None => Err(eyre!("Failed to create checklist")),
    }
  }

  async fn rename(&mut self, id: &str, title: &str) -> Result<()> {
    let title = validate(title, "Title")?;

    if self.state.update_checklist(id, ChecklistUpdate::title(title)).await {
      Ok(())
    } else {
      Err(eyre!("Failed to rename checklist {}", id))
    }
  }

  async fn delete(&mut self, id: &str) -> Result<()> {
    if self.state.delete_checklist(id).await {
      Ok(())
    } else {
      Err(eyre!("Failed to delete checklist {}", id))
    }
  }

  async fn add(&mut self, checklist_id: &str, text: &str) -> Result<()> {
    let text = validate(text, "Item text")?;

    match self.state.add_item(checklist_id, &text).await {
      Some(item) => {
        println!("Added item {}", item.id);
        Ok(())
      }
      None => Err(eyre!("Failed to add item to checklist {}", checklist_id)),
    }
  }

  async fn toggle(&mut self, checklist_id: &str, item_id: &str) -> Result<()> {
    if self.state.toggle_item(checklist_id, item_id).await {
      Ok(())
    } else {
      Err(eyre!("Failed to toggle item {}", item_id))
    }
  }

  async fn edit(&mut self, checklist_id: &str, item_id: &str, text: &str) -> Result<()> {
    let text = validate(text, "Item text")?;

    if self.state.update_item(checklist_id, item_id, ItemUpdate::text(text)).await {
      Ok(())
    } else {
      Err(eyre!("Failed to edit item {}", item_id))
    }
  }

  async fn remove(&mut self, checklist_id: &str, item_id: &str) -> Result<()> {
    if self.state.delete_item(checklist_id, item_id).await {
      Ok(())
    } else {
      Err(eyre!("Failed to remove item {}", item_id))
    }
  }

  async fn clear(&mut self) -> Result<()> {
    if self.state.clear().await {
      println!("All data cleared");
      Ok(())
    } else {
      Err(eyre!("Failed to clear data"))
    }
  }
}

/// Trim user input and reject empty strings. The persistence layer accepts
/// anything; this boundary is where validation lives.
fn validate(value: &str, what: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(eyre!("{} must not be empty", what));
  }
  Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  #[tokio::test]
  async fn test_create_rejects_blank_title() {
    let mut app = App::new(MemoryStore::new()).await.unwrap();
    assert!(app.run(Command::Create { title: "   ".to_string() }).await.is_err());
  }

  #[tokio::test]
  async fn test_rename_unknown_checklist_fails() {
    let mut app = App::new(MemoryStore::new()).await.unwrap();

    let result = app
      .run(Command::Rename {
        id: "no-such-id".to_string(),
        title: "x".to_string(),
      })
      .await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_create_and_list_succeed() {
    let mut app = App::new(MemoryStore::new()).await.unwrap();

    app
      .run(Command::Create {
        title: "Groceries".to_string(),
      })
      .await
      .unwrap();
    app.run(Command::List).await.unwrap();
  }

  #[test]
  fn test_validate_trims() {
    assert_eq!(validate("  Milk  ", "Item text").unwrap(), "Milk");
    assert!(validate("", "Title").is_err());
  }
}
