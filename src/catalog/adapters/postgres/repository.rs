//! `PostgreSQL` repository implementation for products.

use super::{
    models::{NewProductRow, ProductRow},
    schema::products,
};
use crate::catalog::{
    domain::{Product, ProductId, ProductQuery, ProductSortField, SortOrder},
    ports::{ProductListing, ProductRepository, ProductRepositoryError, ProductRepositoryResult},
};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use uuid::Uuid;

/// The stored document belongs to a different product than its row.
#[derive(Debug, Error)]
#[error("document id {document} does not match row id {row}")]
struct MismatchedDocumentId {
    row: Uuid,
    document: Uuid,
}

/// `PostgreSQL`-backed product repository.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProductRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProductRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProductRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProductRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn store(&self, product: &Product) -> ProductRepositoryResult<()> {
        let product_id = product.id();
        let new_row = to_new_row(product)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(products::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProductRepositoryError::DuplicateProduct(product_id)
                    }
                    _ => ProductRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, product: &Product) -> ProductRepositoryResult<()> {
        let product_id = product.id();
        let row = to_new_row(product)?;

        self.run_blocking(move |connection| {
            let updated =
                diesel::update(products::table.filter(products::id.eq(product_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(ProductRepositoryError::persistence)?;
            if updated == 0 {
                return Err(ProductRepositoryError::NotFound(product_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProductId) -> ProductRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(products::table.filter(products::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(ProductRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: ProductId) -> ProductRepositoryResult<Option<Product>> {
        self.run_blocking(move |connection| {
            let row = products::table
                .filter(products::id.eq(id.into_inner()))
                .select(ProductRow::as_select())
                .first::<ProductRow>(connection)
                .optional()
                .map_err(ProductRepositoryError::persistence)?;
            row.map(row_to_product).transpose()
        })
        .await
    }

    async fn list(&self, query: &ProductQuery) -> ProductRepositoryResult<ProductListing> {
        let criteria = query.clone();
        let window = criteria
            .window
            .map(|page| {
                i64::try_from(page.skip())
                    .map(|offset| (offset, i64::from(page.limit())))
                    .map_err(ProductRepositoryError::persistence)
            })
            .transpose()?;

        self.run_blocking(move |connection| {
            let total: i64 = filtered(&criteria)
                .count()
                .get_result(connection)
                .map_err(ProductRepositoryError::persistence)?;
            let mut rows_query = ordered(filtered(&criteria), &criteria);
            if let Some((offset, limit)) = window {
                rows_query = rows_query.offset(offset).limit(limit);
            }
            let rows = rows_query
                .select(ProductRow::as_select())
                .load::<ProductRow>(connection)
                .map_err(ProductRepositoryError::persistence)?;
            Ok(ProductListing {
                items: rows
                    .into_iter()
                    .map(row_to_product)
                    .collect::<ProductRepositoryResult<Vec<_>>>()?,
                total: u64::try_from(total).map_err(ProductRepositoryError::persistence)?,
            })
        })
        .await
    }
}

fn filtered(query: &ProductQuery) -> products::BoxedQuery<'static, Pg> {
    let mut boxed = products::table.into_boxed();
    if let Some(active) = query.active {
        boxed = boxed.filter(products::is_active.eq(active));
    }
    if let Some(needle) = &query.search {
        let pattern = like_pattern(needle);
        boxed = boxed.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern.clone()))
                .or(products::category.ilike(pattern)),
        );
    }
    boxed
}

fn ordered(
    boxed: products::BoxedQuery<'static, Pg>,
    query: &ProductQuery,
) -> products::BoxedQuery<'static, Pg> {
    let sorted = match (query.sort.field, query.sort.order) {
        (ProductSortField::CreatedAt, SortOrder::Ascending) => {
            boxed.order(products::created_at.asc())
        }
        (ProductSortField::CreatedAt, SortOrder::Descending) => {
            boxed.order(products::created_at.desc())
        }
        (ProductSortField::UpdatedAt, SortOrder::Ascending) => {
            boxed.order(products::updated_at.asc())
        }
        (ProductSortField::UpdatedAt, SortOrder::Descending) => {
            boxed.order(products::updated_at.desc())
        }
        (ProductSortField::Name, SortOrder::Ascending) => boxed.order(products::name.asc()),
        (ProductSortField::Name, SortOrder::Descending) => boxed.order(products::name.desc()),
        (ProductSortField::Price, SortOrder::Ascending) => {
            boxed.order(products::price_cents.asc())
        }
        (ProductSortField::Price, SortOrder::Descending) => {
            boxed.order(products::price_cents.desc())
        }
    };
    sorted.then_order_by(products::id.asc())
}

/// Wraps `needle` in `%` after escaping `LIKE` metacharacters.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn to_new_row(product: &Product) -> ProductRepositoryResult<NewProductRow> {
    let document = serde_json::to_value(product).map_err(ProductRepositoryError::persistence)?;

    Ok(NewProductRow {
        id: product.id().into_inner(),
        name: product.name().to_owned(),
        description: product.description().to_owned(),
        category: product.category().map(ToOwned::to_owned),
        price_cents: i64::try_from(product.price().minor_units())
            .map_err(ProductRepositoryError::persistence)?,
        is_active: product.is_active(),
        document,
        created_at: product.created_at(),
        updated_at: product.updated_at(),
    })
}

fn row_to_product(row: ProductRow) -> ProductRepositoryResult<Product> {
    let ProductRow { id, document } = row;
    let product =
        serde_json::from_value::<Product>(document).map_err(ProductRepositoryError::persistence)?;
    if product.id().into_inner() != id {
        return Err(ProductRepositoryError::persistence(MismatchedDocumentId {
            row: id,
            document: product.id().into_inner(),
        }));
    }
    Ok(product)
}
