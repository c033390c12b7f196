//! Public contact form.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::ContactForm;
use store::ShopStore;

use crate::AppState;
use crate::error::ApiError;

/// POST /contact — queue an inquiry to the site mailbox.
#[tracing::instrument(skip(state, form))]
pub async fn submit<S: ShopStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(form): Json<ContactForm>,
) -> Result<StatusCode, ApiError> {
    let contact = state
        .contact
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Contact mailbox is not configured".to_string()))?;
    contact.submit_contact(form)?;
    Ok(StatusCode::ACCEPTED)
}
