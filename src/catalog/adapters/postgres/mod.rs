//! `PostgreSQL` adapters for catalog persistence.

mod inventory;
mod models;
mod repository;
mod schema;

pub use inventory::PostgresInventoryLookup;
pub use repository::PostgresProductRepository;
