use thiserror::Error;

use crate::ItemId;

/// Errors that can occur when interacting with the shop store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another item already uses this slug.
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    /// A line or review refers to an item that does not exist.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// A stored row could not be mapped back into a model value.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
