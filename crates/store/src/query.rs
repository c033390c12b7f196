use crate::{LineStatus, UserId};

/// Builder for selecting a subset of ledger lines.
///
/// Filters combine with AND. Without `newest_first` lines come back in the
/// order they were added.
#[derive(Debug, Clone, Default)]
pub struct LineQuery {
    /// Filter by purchasing user.
    pub buyer: Option<UserId>,

    /// Filter by the owner of the line's item.
    pub seller: Option<UserId>,

    /// Filter by the ordered flag.
    pub ordered: Option<bool>,

    /// Filter by fulfillment status.
    pub status: Option<LineStatus>,

    /// Sort by ordered date, newest first.
    pub newest_first: bool,
}

impl LineQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines still sitting in the buyer's cart.
    pub fn cart_of(buyer: UserId) -> Self {
        Self::new().buyer(buyer).ordered(false)
    }

    /// The buyer's ordered lines with the given status, newest first.
    pub fn orders_of(buyer: UserId, status: LineStatus) -> Self {
        Self::new()
            .buyer(buyer)
            .ordered(true)
            .status(status)
            .newest_first()
    }

    /// Ordered lines for the seller's items, across all statuses.
    pub fn sold_by(seller: UserId) -> Self {
        Self::new().seller(seller).ordered(true)
    }

    /// Filters by buyer.
    pub fn buyer(mut self, buyer: UserId) -> Self {
        self.buyer = Some(buyer);
        self
    }

    /// Filters by item owner.
    pub fn seller(mut self, seller: UserId) -> Self {
        self.seller = Some(seller);
        self
    }

    /// Filters by the ordered flag.
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = Some(ordered);
        self
    }

    /// Filters by status.
    pub fn status(mut self, status: LineStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sorts newest ordered first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_of_selects_unordered_lines() {
        let buyer = UserId::new();
        let query = LineQuery::cart_of(buyer);
        assert_eq!(query.buyer, Some(buyer));
        assert_eq!(query.ordered, Some(false));
        assert!(query.status.is_none());
        assert!(!query.newest_first);
    }

    #[test]
    fn orders_of_sorts_newest_first() {
        let buyer = UserId::new();
        let query = LineQuery::orders_of(buyer, LineStatus::Delivered);
        assert_eq!(query.ordered, Some(true));
        assert_eq!(query.status, Some(LineStatus::Delivered));
        assert!(query.newest_first);
    }

    #[test]
    fn sold_by_chains_status() {
        let seller = UserId::new();
        let query = LineQuery::sold_by(seller).status(LineStatus::Active);
        assert_eq!(query.seller, Some(seller));
        assert_eq!(query.ordered, Some(true));
        assert_eq!(query.status, Some(LineStatus::Active));
    }
}
