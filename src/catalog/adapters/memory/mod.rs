//! In-memory adapters for catalog persistence.

mod inventory;
mod product;

pub use inventory::InMemoryInventory;
pub use product::InMemoryProductRepository;
