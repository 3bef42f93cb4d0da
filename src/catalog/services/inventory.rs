//! Inventory options for the product form.

use super::{CatalogError, CatalogResult};
use crate::catalog::domain::InventoryItem;
use crate::catalog::ports::InventoryLookup;
use crate::identity::domain::Principal;
use std::sync::Arc;
use tracing::debug;

/// Lists inventory items staff can link products to.
pub struct InventoryService<I>
where
    I: InventoryLookup + ?Sized,
{
    lookup: Arc<I>,
}

impl<I> InventoryService<I>
where
    I: InventoryLookup + ?Sized,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(lookup: Arc<I>) -> Self {
        Self { lookup }
    }

    /// Returns every inventory item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] for non-staff requesters and
    /// [`CatalogError::Inventory`] when the lookup fails.
    pub async fn options(&self, requester: &Principal) -> CatalogResult<Vec<InventoryItem>> {
        if !requester.is_staff() {
            return Err(CatalogError::Forbidden);
        }
        let items = self.lookup.list_items().await?;
        debug!(count = items.len(), "listed inventory options");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::adapters::memory::InMemoryInventory;
    use crate::identity::domain::{Role, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> InventoryService<InMemoryInventory> {
        let inventory = InMemoryInventory::new();
        inventory
            .insert(InventoryItem::new("inv-1", "Arctic 9", "LG", 3))
            .expect("insert");
        InventoryService::new(Arc::new(inventory))
    }

    fn principal(role: Role) -> Principal {
        Principal::new(UserId::new("someone").expect("valid user id"), role)
    }

    #[rstest]
    #[tokio::test]
    async fn staff_see_inventory(service: InventoryService<InMemoryInventory>) {
        let items = service
            .options(&principal(Role::Staff))
            .await
            .expect("staff may list");
        assert_eq!(items.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn customers_are_forbidden(service: InventoryService<InMemoryInventory>) {
        let result = service.options(&principal(Role::User)).await;
        assert!(matches!(result, Err(CatalogError::Forbidden)));
    }
}
