//! Error types for catalog validation.

use thiserror::Error;

/// Errors returned while constructing or mutating products.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The product name is empty after trimming.
    #[error("product name must not be empty")]
    EmptyName,

    /// The price is not a non-negative amount with at most two decimals.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The product identifier is not a UUID.
    #[error("invalid product identifier: {0}")]
    InvalidProductId(String),

    /// The sort field is not supported.
    #[error("unsupported sort field: {0}")]
    InvalidSortField(String),
}
