//! Checkout and order history.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::OrderHistory;
use serde::Serialize;
use store::ShopStore;

use crate::AppState;
use crate::error::ApiError;
use crate::identity::CurrentUser;

#[derive(Serialize)]
pub struct OrderPlacedResponse {
    pub lines_ordered: u64,
}

/// POST /orders — check out everything in the caller's cart.
#[tracing::instrument(skip(state))]
pub async fn place<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OrderPlacedResponse>, ApiError> {
    let lines_ordered = state.shop.place_order(&user).await?;
    Ok(Json(OrderPlacedResponse { lines_ordered }))
}

/// GET /orders — the caller's active and delivered lines.
#[tracing::instrument(skip(state))]
pub async fn history<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OrderHistory>, ApiError> {
    Ok(Json(state.shop.view_order_history(&user).await?))
}
