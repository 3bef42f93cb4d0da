//! Read-only inventory lookup port.

use crate::catalog::domain::InventoryItem;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for inventory lookups.
pub type InventoryLookupResult<T> = Result<T, InventoryLookupError>;

/// Read access to the inventory products reference.
#[async_trait]
pub trait InventoryLookup: Send + Sync {
    /// Returns every inventory item ordered by model name.
    async fn list_items(&self) -> InventoryLookupResult<Vec<InventoryItem>>;
}

/// Errors returned by inventory lookups.
#[derive(Debug, Clone, Error)]
pub enum InventoryLookupError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InventoryLookupError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
