//! Inventory items that products can be linked to.

use serde::{Deserialize, Serialize};

/// Stock record offered when linking a product to inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Inventory reference stored on products.
    pub id: String,
    /// Model name.
    pub model_name: String,
    /// Brand name.
    pub brand_name: String,
    /// Units in stock.
    pub quantity: u32,
}

impl InventoryItem {
    /// Creates an inventory item.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        model_name: impl Into<String>,
        brand_name: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
            brand_name: brand_name.into(),
            quantity,
        }
    }
}
