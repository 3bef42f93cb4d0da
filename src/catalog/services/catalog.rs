//! Product catalog orchestration: staff-only writes and image cascades.

use crate::catalog::{
    domain::{CatalogDomainError, Product, ProductDraft, ProductId, ProductPatch, ProductQuery},
    ports::{InventoryLookupError, ProductRepository, ProductRepositoryError},
};
use crate::error::ErrorKind;
use crate::identity::domain::Principal;
use crate::media::domain::StoredImage;
use crate::media::ports::MediaStore;
use crate::media::services::purge_images;
use crate::pagination::{Page, PageInfo};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Changes applied by [`CatalogService::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    /// Field changes.
    pub patch: ProductPatch,
    /// Newly uploaded images.
    pub images: Vec<StoredImage>,
    /// Replace the existing images instead of appending.
    pub replace_images: bool,
}

/// Outcome of deleting a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeletion {
    /// Deleted product.
    pub product_id: ProductId,
    /// Media identifiers whose deletion failed.
    pub failed_media: Vec<String>,
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProductRepositoryError),
    /// Inventory lookup failed.
    #[error(transparent)]
    Inventory(#[from] InventoryLookupError),
    /// No product exists with the given identifier.
    #[error("product {0} not found")]
    NotFound(ProductId),
    /// The requester is not staff.
    #[error("forbidden: staff role required")]
    Forbidden,
}

impl CatalogError {
    /// Classifies the error for the transport layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(ProductRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) | Self::Inventory(_) => ErrorKind::Internal,
            Self::Forbidden => ErrorKind::Forbidden,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product catalog service.
pub struct CatalogService<R, M, C>
where
    R: ProductRepository + ?Sized,
    M: MediaStore + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    media: Arc<M>,
    clock: Arc<C>,
}

impl<R, M, C> CatalogService<R, M, C>
where
    R: ProductRepository + ?Sized,
    M: MediaStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, media: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            repository,
            media,
            clock,
        }
    }

    const fn ensure_staff(requester: &Principal) -> CatalogResult<()> {
        if requester.is_staff() {
            Ok(())
        } else {
            Err(CatalogError::Forbidden)
        }
    }

    async fn find_product_or_error(&self, product_id: ProductId) -> CatalogResult<Product> {
        self.repository
            .find_by_id(product_id)
            .await?
            .ok_or(CatalogError::NotFound(product_id))
    }

    /// Lists products matching `query`.
    ///
    /// Without a page window every match is returned and the pagination
    /// block describes a single page holding all of them.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list(&self, query: &ProductQuery) -> CatalogResult<Page<Product>> {
        let listing = self.repository.list(query).await?;
        let pagination = query.window.map_or_else(
            || PageInfo::single(listing.total),
            |window| window.info(listing.total),
        );
        debug!(total = listing.total, "listed products");
        Ok(Page {
            items: listing.items,
            pagination,
        })
    }

    /// Lists products whose text fields contain `term`.
    ///
    /// A blank term behaves like [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, term: &str, query: ProductQuery) -> CatalogResult<Page<Product>> {
        let needle = term.trim();
        let searched = ProductQuery {
            search: (!needle.is_empty()).then(|| needle.to_owned()),
            ..query
        };
        self.list(&searched).await
    }

    /// Returns one product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the product does not exist,
    /// or repository errors.
    pub async fn get(&self, product_id: ProductId) -> CatalogResult<Product> {
        self.find_product_or_error(product_id).await
    }

    /// Creates an active product. Staff only.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] for non-staff requesters, or
    /// repository errors.
    pub async fn create(
        &self,
        draft: ProductDraft,
        images: Vec<StoredImage>,
        requester: &Principal,
    ) -> CatalogResult<Product> {
        Self::ensure_staff(requester)?;
        let product = Product::create(draft, images, &*self.clock);
        self.repository.store(&product).await?;
        info!(product_id = %product.id(), name = product.name(), "product created");
        Ok(product)
    }

    /// Updates fields and images. Staff only.
    ///
    /// Replaced images are deleted from the media store once the product
    /// has been saved; failures are logged.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] for non-staff requesters,
    /// [`CatalogError::NotFound`] when the product does not exist, domain
    /// errors for a blank name, or repository errors.
    pub async fn update(
        &self,
        product_id: ProductId,
        update: ProductUpdate,
        requester: &Principal,
    ) -> CatalogResult<Product> {
        Self::ensure_staff(requester)?;
        let mut product = self.find_product_or_error(product_id).await?;
        let ProductUpdate {
            patch,
            images,
            replace_images,
        } = update;
        product.apply_patch(patch, &*self.clock)?;
        let replaced = if replace_images || !images.is_empty() {
            product.attach_images(images, replace_images, &*self.clock)
        } else {
            Vec::new()
        };
        self.repository.update(&product).await?;
        let failed_media = purge_images(&*self.media, &replaced).await;
        if !failed_media.is_empty() {
            warn!(%product_id, ?failed_media, "some replaced product images could not be deleted");
        }
        info!(%product_id, replaced = replaced.len(), "product updated");
        Ok(product)
    }

    /// Deletes a product and requests deletion of its images. Staff only.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] for non-staff requesters,
    /// [`CatalogError::NotFound`] when the product does not exist, or
    /// repository errors.
    pub async fn delete(
        &self,
        product_id: ProductId,
        requester: &Principal,
    ) -> CatalogResult<ProductDeletion> {
        Self::ensure_staff(requester)?;
        let product = self.find_product_or_error(product_id).await?;
        let failed_media = purge_images(&*self.media, product.images()).await;
        if !failed_media.is_empty() {
            warn!(%product_id, ?failed_media, "some product images could not be deleted");
        }
        if !self.repository.delete(product_id).await? {
            return Err(CatalogError::NotFound(product_id));
        }
        info!(%product_id, by = %requester.id(), "product deleted");
        Ok(ProductDeletion {
            product_id,
            failed_media,
        })
    }

    /// Flips storefront visibility. Staff only.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Forbidden`] for non-staff requesters,
    /// [`CatalogError::NotFound`] when the product does not exist, or
    /// repository errors.
    pub async fn toggle_active(
        &self,
        product_id: ProductId,
        requester: &Principal,
    ) -> CatalogResult<Product> {
        Self::ensure_staff(requester)?;
        let mut product = self.find_product_or_error(product_id).await?;
        let active = product.toggle_active(&*self.clock);
        self.repository.update(&product).await?;
        info!(%product_id, active, "product visibility toggled");
        Ok(product)
    }
}
