//! The buyer's cart.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{CartLine, CartView};
use serde::Deserialize;
use store::ShopStore;

use super::parse_line_id;
use crate::AppState;
use crate::error::ApiError;
use crate::identity::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct AddToCartParams {
    pub quantity: Option<i32>,
}

/// POST /items/:slug/cart — add one line for the item to the caller's cart.
#[tracing::instrument(skip(state))]
pub async fn add<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Query(params): Query<AddToCartParams>,
) -> Result<(StatusCode, Json<CartLine>), ApiError> {
    let line = state
        .shop
        .add_to_cart(&user, &slug, params.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// GET /cart — the caller's unordered lines and totals.
#[tracing::instrument(skip(state))]
pub async fn view<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CartView>, ApiError> {
    Ok(Json(state.shop.view_cart(&user).await?))
}

/// DELETE /cart/:line_id — drop a line from the caller's cart.
#[tracing::instrument(skip(state))]
pub async fn remove<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(line_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let line_id = parse_line_id(&line_id)?;
    state.shop.delete_cart_line(&user, line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
