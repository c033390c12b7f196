//! Domain error types.

use store::{LineStatus, Money, ParseStatusError, StoreError};
use thiserror::Error;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced item, slug, or line does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The caller is authenticated but may not act on this resource.
    #[error("Forbidden: not permitted to {action}")]
    Forbidden { action: &'static str },

    /// No identity was supplied with the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The line is not in a state that allows the requested change.
    #[error("Invalid transition for line {line}: {reason}")]
    InvalidTransition { line: String, reason: &'static str },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            // The item vanished between lookup and write.
            StoreError::UnknownItem(item_id) => DomainError::not_found("Item", item_id),
            other => DomainError::Store(other),
        }
    }
}

impl DomainError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Field-level input problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Slugs are lowercase ASCII letters, digits and dashes.
    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Invalid price: {0} (must not be negative)")]
    NegativePrice(Money),

    #[error("Invalid hours: {0} (must not be negative)")]
    NegativeHours(i32),

    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(i32),

    #[error("Unknown status: {0:?}")]
    UnknownStatus(String),

    /// The status exists but cannot be set by a seller.
    #[error("Cannot change status to {0}")]
    UnsupportedStatus(LineStatus),

    /// A mail header contained a line break.
    #[error("Invalid header found in {0}")]
    HeaderInjection(&'static str),
}

impl From<ParseStatusError> for ValidationError {
    fn from(e: ParseStatusError) -> Self {
        ValidationError::UnknownStatus(e.0)
    }
}
