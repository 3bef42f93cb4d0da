//! Repository port for product persistence.

use crate::catalog::domain::{Product, ProductId, ProductQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for product repository operations.
pub type ProductRepositoryResult<T> = Result<T, ProductRepositoryError>;

/// Matching products plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    /// Products inside the requested window, in query order.
    pub items: Vec<Product>,
    /// Number of products matching the filters.
    pub total: u64,
}

/// Product persistence contract.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores a new product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductRepositoryError::DuplicateProduct`] when the
    /// identifier already exists.
    async fn store(&self, product: &Product) -> ProductRepositoryResult<()>;

    /// Replaces an existing product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductRepositoryError::NotFound`] when the product does
    /// not exist.
    async fn update(&self, product: &Product) -> ProductRepositoryResult<()>;

    /// Removes a product; returns `false` when it did not exist.
    async fn delete(&self, id: ProductId) -> ProductRepositoryResult<bool>;

    /// Finds a product by identifier.
    async fn find_by_id(&self, id: ProductId) -> ProductRepositoryResult<Option<Product>>;

    /// Lists products matching `query`.
    async fn list(&self, query: &ProductQuery) -> ProductRepositoryResult<ProductListing>;
}

/// Errors returned by product repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProductRepositoryError {
    /// A product with the same identifier already exists.
    #[error("duplicate product identifier: {0}")]
    DuplicateProduct(ProductId),

    /// The product was not found.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProductRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
