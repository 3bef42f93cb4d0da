//! Listing and search criteria for the catalog.

use super::{CatalogDomainError, Product};
use crate::pagination::Pagination;
use std::cmp::Ordering;

/// Field used to order product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last modification time.
    UpdatedAt,
    /// Product name.
    Name,
    /// Product price.
    Price,
}

impl ProductSortField {
    /// Returns the wire name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Name => "name",
            Self::Price => "price",
        }
    }
}

impl TryFrom<&str> for ProductSortField {
    type Error = CatalogDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            other => Err(CatalogDomainError::InvalidSortField(other.to_owned())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

impl SortOrder {
    /// Parses a direction; only `asc` selects ascending order.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Ordering applied to product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductSort {
    /// Field to order by.
    pub field: ProductSortField,
    /// Direction.
    pub order: SortOrder,
}

impl ProductSort {
    /// Compares two products; ties break on identifier for a stable order.
    #[must_use]
    pub fn compare(&self, left: &Product, right: &Product) -> Ordering {
        let by_field = match self.field {
            ProductSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            ProductSortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
            ProductSortField::Name => left.name().cmp(right.name()),
            ProductSortField::Price => left.price().cmp(&right.price()),
        };
        let directed = match self.order {
            SortOrder::Ascending => by_field,
            SortOrder::Descending => by_field.reverse(),
        };
        directed.then_with(|| left.id().into_inner().cmp(&right.id().into_inner()))
    }
}

/// Criteria for listing or searching products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only products with this visibility.
    pub active: Option<bool>,
    /// Case-insensitive text matched against name, description and category.
    pub search: Option<String>,
    /// Ordering.
    pub sort: ProductSort,
    /// Page window; `None` returns every match.
    pub window: Option<Pagination>,
}

impl ProductQuery {
    /// Returns whether `product` satisfies the filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.active.is_none_or(|active| product.is_active() == active)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| product.matches_text(needle))
    }
}
