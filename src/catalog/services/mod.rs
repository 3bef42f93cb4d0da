//! Catalog orchestration services.

mod catalog;
mod inventory;

pub use catalog::{
    CatalogError, CatalogResult, CatalogService, ProductDeletion, ProductUpdate,
};
pub use inventory::InventoryService;
