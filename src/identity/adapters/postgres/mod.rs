//! `PostgreSQL` adapter for user profile lookup.

mod models;
mod repository;
mod schema;

pub use repository::PostgresUserDirectory;
