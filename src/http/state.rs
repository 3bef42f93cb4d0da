//! Shared application state handed to every handler.

use crate::catalog::ports::{InventoryLookup, ProductRepository};
use crate::catalog::services::{CatalogService, InventoryService};
use crate::identity::ports::{IdentityProvider, UserDirectory};
use crate::issue::ports::IssueRepository;
use crate::issue::services::{IssueLifecycleService, IssueNotifications};
use crate::media::adapters::local::LocalMediaStore;
use crate::media::ports::MediaStore;
use crate::notification::ports::Notifier;
use mockable::DefaultClock;
use std::sync::Arc;

/// Default per-file upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Issue service wired with trait-object collaborators.
pub type IssueService = IssueLifecycleService<
    dyn IssueRepository,
    dyn MediaStore,
    dyn Notifier,
    dyn UserDirectory,
    DefaultClock,
>;

/// Catalog service wired with trait-object collaborators.
pub type ProductCatalog = CatalogService<dyn ProductRepository, dyn MediaStore, DefaultClock>;

/// Inventory options wired with a trait-object lookup.
pub type InventoryOptions = InventoryService<dyn InventoryLookup>;

/// Adapters selected at startup.
pub struct Collaborators {
    /// Issue persistence.
    pub issues: Arc<dyn IssueRepository>,
    /// Product persistence.
    pub products: Arc<dyn ProductRepository>,
    /// Inventory items products can reference.
    pub inventory: Arc<dyn InventoryLookup>,
    /// Image storage.
    pub media: Arc<dyn MediaStore>,
    /// SMS delivery.
    pub notifier: Arc<dyn Notifier>,
    /// User profile lookup.
    pub directory: Arc<dyn UserDirectory>,
    /// Credential verification.
    pub identity: Arc<dyn IdentityProvider>,
}

/// State shared by all routes.
#[derive(Clone)]
pub struct AppState {
    /// Issue lifecycle operations.
    pub issues: Arc<IssueService>,
    /// Catalog operations.
    pub catalog: Arc<ProductCatalog>,
    /// Inventory options for the product form.
    pub inventory: Arc<InventoryOptions>,
    /// Image storage used for uploads before entities are saved.
    pub media: Arc<dyn MediaStore>,
    /// Credential verification.
    pub identity: Arc<dyn IdentityProvider>,
    /// User profile lookup.
    pub directory: Arc<dyn UserDirectory>,
    /// Filesystem store served under `/uploads`, when in use.
    pub local_media: Option<Arc<LocalMediaStore>>,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Builds the services around the given adapters.
    ///
    /// # Errors
    ///
    /// Returns the template error when notification templates fail to load.
    pub fn new(collaborators: Collaborators) -> Result<Self, minijinja::Error> {
        let Collaborators {
            issues,
            products,
            inventory,
            media,
            notifier,
            directory,
            identity,
        } = collaborators;
        let clock = Arc::new(DefaultClock);
        let notifications = IssueNotifications::new(notifier, Arc::clone(&directory))?;
        let issue_service = IssueLifecycleService::new(
            issues,
            Arc::clone(&media),
            notifications,
            Arc::clone(&clock),
        );
        let catalog = CatalogService::new(products, Arc::clone(&media), clock);
        Ok(Self {
            issues: Arc::new(issue_service),
            catalog: Arc::new(catalog),
            inventory: Arc::new(InventoryService::new(inventory)),
            media,
            identity,
            directory,
            local_media: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    /// Serves files from `store` under `/uploads`.
    #[must_use]
    pub fn with_local_media(mut self, store: Arc<LocalMediaStore>) -> Self {
        self.local_media = Some(store);
        self
    }

    /// Overrides the per-file upload limit.
    #[must_use]
    pub const fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
