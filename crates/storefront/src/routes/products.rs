//! Product listing route handlers.
//!
//! Each handler resolves the caller's pricing context once and serves one
//! listing under it.

use axum::{Json, extract::State};
use freshcart_core::{ProductId, SubcategoryId};

use super::PathId;
use crate::error::Result;
use crate::middleware::{RequireUser, SelectedStore};
use crate::models::{
    ListQuery, PageQuery, PaginatedProductResponse, ProductDetailResponse, ProductListResponse,
};
use crate::services::CatalogService;
use crate::state::AppState;

/// All products, paginated and optionally searched.
pub async fn all_products(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    query: PageQuery,
) -> Result<Json<PaginatedProductResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    let response = catalog
        .all_products(query.search(), query.page(), query.limit())
        .await?;
    Ok(Json(response))
}

/// Exclusive offers.
pub async fn exclusive_offers(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.exclusive_offers(query.limit()).await?))
}

/// Best sellers.
pub async fn best_selling(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.best_selling(query.limit()).await?))
}

/// Newest products.
pub async fn new_products(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.new_products(query.limit()).await?))
}

/// Products the resolved customer ordered before; empty in catalog mode.
pub async fn buy_again(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.buy_again(query.limit()).await?))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    PathId(product_id): PathId<ProductId>,
) -> Result<Json<ProductDetailResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.product(product_id).await?))
}

/// Products in the same catalog group.
pub async fn siblings(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    PathId(product_id): PathId<ProductId>,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(
        catalog.catalog_siblings(product_id, query.limit()).await?,
    ))
}

/// Products in the same subcategory.
pub async fn similar(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    PathId(product_id): PathId<ProductId>,
    query: ListQuery,
) -> Result<Json<ProductListResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(
        catalog.similar_products(product_id, query.limit()).await?,
    ))
}

/// Products in a subcategory, paginated.
pub async fn subcategory_products(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
    PathId(subcategory_id): PathId<SubcategoryId>,
    query: PageQuery,
) -> Result<Json<PaginatedProductResponse>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    let response = catalog
        .subcategory_products(subcategory_id, query.page(), query.limit())
        .await?;
    Ok(Json(response))
}
