//! Checklist domain model and persistence.

mod service;
mod types;

pub use service::ChecklistService;
pub use types::{now_iso, Checklist, ChecklistItem, ChecklistUpdate, ItemUpdate};
