//! Read-side results handed to the presentation layer.

use serde::Serialize;
use store::{Item, ItemOrderCount, LineView, Money, Review, Totals};

/// The buyer's unordered lines and their sums.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub totals: Totals,
}

/// The buyer's ordered lines, split by status.
///
/// `totals` covers the active group only.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHistory {
    pub active: Vec<LineView>,
    pub delivered: Vec<LineView>,
    pub totals: Totals,
}

/// Fulfillment overview for a seller.
#[derive(Debug, Clone, Serialize)]
pub struct SellerDashboard {
    pub active_count: u64,
    pub delivered_count: u64,
    /// Item price summed over every ordered line, whatever its status.
    pub revenue: Money,
    pub item_counts: Vec<ItemOrderCount>,
}

/// An item page with its most recent reviews.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub item: Item,
    pub reviews: Vec<Review>,
}
