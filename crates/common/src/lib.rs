//! Shared identifier types for the ordering service.

mod types;

pub use types::{CartLineId, ItemId, ReviewId, UserId};
