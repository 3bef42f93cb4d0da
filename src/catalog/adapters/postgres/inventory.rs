//! `PostgreSQL` inventory lookup.

use super::{models::InventoryRow, schema::inventory_items};
use crate::catalog::domain::InventoryItem;
use crate::catalog::ports::{InventoryLookup, InventoryLookupError, InventoryLookupResult};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed inventory lookup.
#[derive(Debug, Clone)]
pub struct PostgresInventoryLookup {
    pool: PgPool,
}

impl PostgresInventoryLookup {
    /// Creates a lookup from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryLookup for PostgresInventoryLookup {
    async fn list_items(&self) -> InventoryLookupResult<Vec<InventoryItem>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(InventoryLookupError::persistence)?;
            let rows = inventory_items::table
                .order((inventory_items::model_name.asc(), inventory_items::id.asc()))
                .select(InventoryRow::as_select())
                .load::<InventoryRow>(&mut connection)
                .map_err(InventoryLookupError::persistence)?;
            rows.into_iter().map(row_to_item).collect()
        })
        .await
        .map_err(InventoryLookupError::persistence)?
    }
}

fn row_to_item(row: InventoryRow) -> InventoryLookupResult<InventoryItem> {
    let InventoryRow {
        id,
        model_name,
        brand_name,
        quantity,
    } = row;
    let stock = u32::try_from(quantity).map_err(InventoryLookupError::persistence)?;
    Ok(InventoryItem::new(id, model_name, brand_name, stock))
}
