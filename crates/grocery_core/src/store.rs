//! In-memory item store
//!
//! The store owns the authoritative list. Every mutation is applied
//! synchronously and is visible to the next `list()`/`filtered()` call.

use crate::item::{Item, ItemId};
use grocery_common::{GroceryError, Result};
use std::collections::HashSet;

/// Ordered collection of items, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current items in insertion order
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    /// Items whose text contains `query`, ignoring case
    pub fn filtered(&self, query: &str) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.matches(query))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next added item will receive, `None` once the id space is exhausted
    pub fn next_id(&self) -> Option<ItemId> {
        match self.items.iter().map(|item| item.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Append a new unchecked item
    pub fn add(&mut self, text: &str) -> Result<Item> {
        if text.is_empty() {
            return Err(GroceryError::ValidationError(
                "item text cannot be empty".to_string(),
            ));
        }

        let id = self.next_id().ok_or_else(|| {
            GroceryError::ValidationError(format!("no item id left after {}", ItemId::MAX))
        })?;

        let item = Item::new(id, text);
        self.items.push(item.clone());
        tracing::debug!(id = item.id, "Added item");
        Ok(item)
    }

    /// Flip the checked flag of an item
    pub fn toggle_checked(&mut self, id: ItemId) -> Result<Item> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(GroceryError::NotFound { id })?;

        item.checked = !item.checked;
        tracing::debug!(id, checked = item.checked, "Toggled item");
        Ok(item.clone())
    }

    /// Remove an item; unknown ids are an error, not a no-op
    pub fn remove(&mut self, id: ItemId) -> Result<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(GroceryError::NotFound { id })?;

        tracing::debug!(id, "Removed item");
        Ok(self.items.remove(index))
    }

    /// Install the initial load result, replacing the current contents
    pub fn replace_all(&mut self, items: Vec<Item>) -> Result<()> {
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.id)) {
            return Err(GroceryError::ValidationError(format!(
                "duplicate item id {}",
                dup.id
            )));
        }

        self.items = items;
        Ok(())
    }
}
