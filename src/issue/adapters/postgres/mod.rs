//! `PostgreSQL` adapters for issue persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresIssueRepository;
