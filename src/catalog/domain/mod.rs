//! Domain model for catalog products.

mod error;
mod ids;
mod inventory;
mod price;
mod product;
mod query;

pub use error::CatalogDomainError;
pub use ids::ProductId;
pub use inventory::InventoryItem;
pub use price::Price;
pub use product::{Product, ProductDraft, ProductPatch};
pub use query::{ProductQuery, ProductSort, ProductSortField, SortOrder};
