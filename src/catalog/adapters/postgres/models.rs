//! Diesel row models for product persistence.

use super::schema::{inventory_items, products};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for product records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    /// Product identifier.
    pub id: uuid::Uuid,
    /// Full product document.
    pub document: Value,
}

/// Insert and update model for product records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct NewProductRow {
    /// Product identifier.
    pub id: uuid::Uuid,
    /// Product name.
    pub name: String,
    /// Product description.
    pub description: String,
    /// Product category.
    pub category: Option<String>,
    /// Price in minor units.
    pub price_cents: i64,
    /// Storefront visibility.
    pub is_active: bool,
    /// Full product document.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for inventory items.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InventoryRow {
    /// Inventory reference.
    pub id: String,
    /// Model name.
    pub model_name: String,
    /// Brand name.
    pub brand_name: String,
    /// Units in stock.
    pub quantity: i32,
}
