//! Catalog browsing, item management and reviews.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{Item, ItemDetail, ItemDraft, Review};
use serde::{Deserialize, Serialize};
use store::ShopStore;

use crate::AppState;
use crate::error::ApiError;
use crate::identity::{CurrentUser, MaybeUser};

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub review: String,
}

#[derive(Serialize)]
pub struct ItemDetailResponse {
    #[serde(flatten)]
    pub detail: ItemDetail,
    /// True when the caller owns the item and may edit or delete it.
    pub editable: bool,
}

/// GET /items — the public catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.shop.list_items().await?))
}

/// GET /items/:slug — an item with its latest reviews.
#[tracing::instrument(skip(state))]
pub async fn detail<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
) -> Result<Json<ItemDetailResponse>, ApiError> {
    let detail = state.shop.item_detail(&slug).await?;
    let editable = user.is_some_and(|u| u.user_id == detail.item.created_by);
    Ok(Json(ItemDetailResponse { detail, editable }))
}

/// POST /items — list a new item for sale.
#[tracing::instrument(skip(state, draft))]
pub async fn create<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ItemDraft>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.shop.create_item(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/:slug — replace an item's fields.
#[tracing::instrument(skip(state, draft))]
pub async fn update<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.shop.update_item(&user, &slug, draft).await?))
}

/// DELETE /items/:slug — remove an item and everything that refers to it.
#[tracing::instrument(skip(state))]
pub async fn delete<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.shop.delete_item(&user, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /items/:slug/reviews — review an item.
#[tracing::instrument(skip(state, req))]
pub async fn add_review<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.shop.add_review(&user, &slug, &req.review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
