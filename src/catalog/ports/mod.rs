//! Port contracts for catalog persistence.

mod inventory;
mod repository;

pub use inventory::{InventoryLookup, InventoryLookupError, InventoryLookupResult};
pub use repository::{
    ProductListing, ProductRepository, ProductRepositoryError, ProductRepositoryResult,
};
