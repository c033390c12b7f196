//! Seller catalog, fulfillment queue and dashboard.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{CartLine, Item, LineView, SellerDashboard};
use serde::Deserialize;
use store::ShopStore;

use super::parse_line_id;
use crate::AppState;
use crate::error::ApiError;
use crate::identity::CurrentUser;

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// GET /seller/items — the caller's own listings.
#[tracing::instrument(skip(state))]
pub async fn items<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.shop.seller_items(&user).await?))
}

/// GET /seller/orders/pending — active lines awaiting fulfillment.
#[tracing::instrument(skip(state))]
pub async fn pending<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LineView>>, ApiError> {
    Ok(Json(state.shop.list_pending_orders(&user).await?))
}

/// GET /seller/orders/delivered — lines already fulfilled.
#[tracing::instrument(skip(state))]
pub async fn delivered<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LineView>>, ApiError> {
    Ok(Json(state.shop.delivered_orders(&user).await?))
}

/// POST /seller/orders/:line_id/status — mark a line delivered.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(line_id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<CartLine>, ApiError> {
    let line_id = parse_line_id(&line_id)?;
    Ok(Json(
        state
            .shop
            .update_status(&user, line_id, &req.status)
            .await?,
    ))
}

/// GET /seller/dashboard — counts, revenue and per-item orders.
#[tracing::instrument(skip(state))]
pub async fn dashboard<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SellerDashboard>, ApiError> {
    Ok(Json(state.shop.seller_dashboard(&user).await?))
}
