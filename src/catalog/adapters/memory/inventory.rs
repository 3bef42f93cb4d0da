//! In-memory inventory lookup.

use crate::catalog::domain::InventoryItem;
use crate::catalog::ports::{InventoryLookup, InventoryLookupError, InventoryLookupResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory inventory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    items: Arc<RwLock<HashMap<String, InventoryItem>>>,
}

impl InMemoryInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an item.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryLookupError::Persistence`] when the lock is poisoned.
    pub fn insert(&self, item: InventoryItem) -> InventoryLookupResult<()> {
        let mut items = self.items.write().map_err(|err| {
            InventoryLookupError::persistence(std::io::Error::other(err.to_string()))
        })?;
        items.insert(item.id.clone(), item);
        Ok(())
    }
}

#[async_trait]
impl InventoryLookup for InMemoryInventory {
    async fn list_items(&self) -> InventoryLookupResult<Vec<InventoryItem>> {
        let items = self.items.read().map_err(|err| {
            InventoryLookupError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut listed: Vec<InventoryItem> = items.values().cloned().collect();
        listed.sort_by(|left, right| {
            left.model_name
                .cmp(&right.model_name)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(listed)
    }
}
