//! The workflow layer: cart, checkout, fulfillment and catalog operations.

mod cart;
mod catalog;
mod fulfillment;
mod orders;

use store::ShopStore;

/// Number of reviews shown on an item page.
pub const REVIEWS_PER_ITEM: usize = 7;

/// Service for the ordering workflow.
///
/// Each operation authorizes the caller, reads or mutates the store, and
/// returns plain data for rendering.
pub struct ShopService<S: ShopStore> {
    store: S,
}

impl<S: ShopStore> ShopService<S> {
    /// Creates a new service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
