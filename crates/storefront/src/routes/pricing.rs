//! Pricing context route handler.

use axum::{Json, extract::State};
use freshcart_core::PricingSummary;

use crate::error::Result;
use crate::middleware::{RequireUser, SelectedStore};
use crate::services::CatalogService;
use crate::state::AppState;

/// Report the caller's resolved pricing context.
///
/// The app calls this on launch to decide whether to render prices.
pub async fn context(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    SelectedStore(selected): SelectedStore,
) -> Result<Json<PricingSummary>> {
    let catalog = CatalogService::for_caller(state.pool(), &user_id, selected).await?;
    Ok(Json(catalog.context().summary()))
}
