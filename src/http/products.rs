//! Catalog routes under `/api/products`.

use super::auth::CurrentUser;
use super::error::{ApiError, ApiResult};
use super::response::ApiResponse;
use super::state::AppState;
use super::upload::{UploadForm, discard_uploads, store_uploads};
use crate::catalog::domain::{
    InventoryItem, Price, Product, ProductDraft, ProductId, ProductPatch, ProductQuery, ProductSort,
    ProductSortField, SortOrder,
};
use crate::catalog::services::{ProductDeletion, ProductUpdate};
use crate::media::domain::PRODUCT_IMAGE_FOLDER;
use crate::pagination::{Page, Pagination};
use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use serde::Deserialize;

/// `limit` value requesting every product at once.
const UNPAGINATED: i64 = -1;

/// Builds the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/inventory", get(inventory_options))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/toggle-active", patch(toggle_active))
}

fn parse_product_id(raw: &str) -> ApiResult<ProductId> {
    Ok(raw.parse::<ProductId>()?)
}

/// Query string accepted by listing and search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductListQuery {
    page: Option<u32>,
    limit: Option<i64>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    active: Option<String>,
    q: Option<String>,
}

impl ProductListQuery {
    fn to_query(&self) -> ApiResult<ProductQuery> {
        let window = match self.limit {
            Some(UNPAGINATED) => None,
            Some(limit) => {
                let size = u32::try_from(limit)
                    .map_err(|_| ApiError::validation(format!("invalid limit: {limit}")))?;
                Some(Pagination::new(self.page, Some(size)))
            }
            None => Some(Pagination::new(self.page, None)),
        };
        let field = self
            .sort_by
            .as_deref()
            .map(ProductSortField::try_from)
            .transpose()?
            .unwrap_or_default();
        let order = self
            .sort_order
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or_default();
        Ok(ProductQuery {
            active: self.active.as_deref().map(|value| value == "true"),
            search: None,
            sort: ProductSort { field, order },
            window,
        })
    }
}

async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Page<Product>>> {
    let Query(params) = query?;
    let page = state.catalog.list(&params.to_query()?).await?;
    Ok(ApiResponse::ok(page))
}

async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Page<Product>>> {
    let Query(params) = query?;
    let term = params.q.as_deref().unwrap_or_default();
    let page = state.catalog.search(term, params.to_query()?).await?;
    Ok(ApiResponse::ok(page))
}

async fn inventory_options(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<ApiResponse<Vec<InventoryItem>>> {
    Ok(ApiResponse::ok(state.inventory.options(&principal).await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Product>> {
    let product_id = parse_product_id(&id)?;
    Ok(ApiResponse::ok(state.catalog.get(product_id).await?))
}

fn draft_from(form: &UploadForm) -> ApiResult<ProductDraft> {
    let price = Price::parse(form.require("price")?)?;
    let mut draft = ProductDraft::new(form.require("name")?, price)?;
    if let Some(description) = form.text("description") {
        draft = draft.with_description(description);
    }
    if let Some(category) = form.text("category") {
        draft = draft.with_category(category);
    }
    if let Some(reference) = form.text("inventoryItem") {
        draft = draft.with_inventory_item(reference);
    }
    Ok(draft)
}

fn patch_from(form: &UploadForm) -> ApiResult<ProductPatch> {
    let mut changes = ProductPatch::new();
    if let Some(name) = form.text("name") {
        changes = changes.with_name(name);
    }
    if let Some(description) = form.text("description") {
        changes = changes.with_description(description);
    }
    if let Some(raw) = form.text("price") {
        changes = changes.with_price(Price::parse(raw)?);
    }
    if let Some(category) = form.text("category") {
        changes = changes.with_category(category);
    }
    if let Some(reference) = form.text("inventoryItem") {
        changes = changes.with_inventory_item(reference);
    }
    if form.text("active").is_some() {
        changes = changes.with_active(form.flag("active"));
    }
    Ok(changes)
}

async fn create_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, ApiResponse<Product>)> {
    let form = UploadForm::read(multipart, state.max_upload_bytes).await?;
    let draft = draft_from(&form)?;
    let images = store_uploads(&*state.media, &form, PRODUCT_IMAGE_FOLDER).await?;
    match state
        .catalog
        .create(draft, images.clone(), &principal)
        .await
    {
        Ok(product) => Ok((
            StatusCode::CREATED,
            ApiResponse::ok(product).with_message("Product created"),
        )),
        Err(err) => {
            discard_uploads(&*state.media, &images).await;
            Err(err.into())
        }
    }
}

async fn update_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Product>> {
    let product_id = parse_product_id(&id)?;
    let form = UploadForm::read(multipart, state.max_upload_bytes).await?;
    let changes = patch_from(&form)?;
    let images = store_uploads(&*state.media, &form, PRODUCT_IMAGE_FOLDER).await?;
    let update = ProductUpdate {
        patch: changes,
        images: images.clone(),
        replace_images: form.flag("replaceImages"),
    };
    match state.catalog.update(product_id, update, &principal).await {
        Ok(product) => Ok(ApiResponse::ok(product).with_message("Product updated")),
        Err(err) => {
            discard_uploads(&*state.media, &images).await;
            Err(err.into())
        }
    }
}

async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<ProductDeletion>> {
    let product_id = parse_product_id(&id)?;
    let deletion = state.catalog.delete(product_id, &principal).await?;
    Ok(ApiResponse::ok(deletion).with_message("Product deleted"))
}

async fn toggle_active(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Product>> {
    let product_id = parse_product_id(&id)?;
    let product = state.catalog.toggle_active(product_id, &principal).await?;
    let message = if product.is_active() {
        "Product activated"
    } else {
        "Product deactivated"
    };
    Ok(ApiResponse::ok(product).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_limit_disables_paging() {
        let params = ProductListQuery {
            limit: Some(UNPAGINATED),
            ..ProductListQuery::default()
        };
        let query = params.to_query().expect("valid query");
        assert_eq!(query.window, None);
    }

    #[test]
    fn defaults_sort_newest_first() {
        let query = ProductListQuery::default().to_query().expect("valid query");
        assert_eq!(query.sort.field, ProductSortField::CreatedAt);
        assert_eq!(query.sort.order, SortOrder::Descending);
        assert_eq!(query.window, Some(Pagination::default()));
    }

    #[test]
    fn other_negative_limits_are_rejected() {
        let params = ProductListQuery {
            limit: Some(-5),
            ..ProductListQuery::default()
        };
        assert!(params.to_query().is_err());
    }
}
