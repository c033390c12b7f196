//! Route handlers, grouped by area.

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod seller;

use common::CartLineId;

use crate::error::ApiError;

fn parse_line_id(id: &str) -> Result<CartLineId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid line ID format: {e}")))?;
    Ok(CartLineId::from_uuid(uuid))
}
