//! In-memory repository for products.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::{
    domain::{Product, ProductId, ProductQuery},
    ports::{ProductListing, ProductRepository, ProductRepositoryError, ProductRepositoryResult},
};

/// Thread-safe in-memory product repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    state: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ProductRepositoryResult<RwLockReadGuard<'_, HashMap<ProductId, Product>>> {
        self.state.read().map_err(|err| {
            ProductRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ProductRepositoryResult<RwLockWriteGuard<'_, HashMap<ProductId, Product>>> {
        self.state.write().map_err(|err| {
            ProductRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn store(&self, product: &Product) -> ProductRepositoryResult<()> {
        let mut products = self.write()?;
        if products.contains_key(&product.id()) {
            return Err(ProductRepositoryError::DuplicateProduct(product.id()));
        }
        products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> ProductRepositoryResult<()> {
        let mut products = self.write()?;
        let slot = products
            .get_mut(&product.id())
            .ok_or(ProductRepositoryError::NotFound(product.id()))?;
        *slot = product.clone();
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> ProductRepositoryResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: ProductId) -> ProductRepositoryResult<Option<Product>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> ProductRepositoryResult<ProductListing> {
        let mut matching: Vec<Product> = self
            .read()?
            .values()
            .filter(|product| query.matches(product))
            .cloned()
            .collect();
        matching.sort_by(|left, right| query.sort.compare(left, right));
        let total = u64::try_from(matching.len()).map_err(ProductRepositoryError::persistence)?;
        let Some(window) = query.window else {
            return Ok(ProductListing {
                items: matching,
                total,
            });
        };
        let skip = usize::try_from(window.skip()).map_err(ProductRepositoryError::persistence)?;
        let limit = usize::try_from(window.limit()).map_err(ProductRepositoryError::persistence)?;
        Ok(ProductListing {
            items: matching.into_iter().skip(skip).take(limit).collect(),
            total,
        })
    }
}
