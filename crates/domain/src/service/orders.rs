use chrono::Utc;
use store::{LineQuery, LineStatus, ShopStore};

use super::ShopService;
use crate::auth::Identity;
use crate::error::DomainError;
use crate::views::OrderHistory;

impl<S: ShopStore> ShopService<S> {
    /// Checks out the buyer's cart.
    ///
    /// All unordered lines become `Active` with the same ordered date in a
    /// single store update. An empty cart is not an error. Returns the
    /// number of lines ordered.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(&self, buyer: &Identity) -> Result<u64, DomainError> {
        let placed = self.store.place_order(buyer.user_id, Utc::now()).await?;

        if placed > 0 {
            metrics::counter!("shop_orders_placed_total").increment(1);
            metrics::counter!("shop_lines_ordered_total").increment(placed);
            tracing::info!(buyer = %buyer.user_id, lines = placed, "order placed");
        }
        Ok(placed)
    }

    /// The buyer's active and delivered lines, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn view_order_history(&self, buyer: &Identity) -> Result<OrderHistory, DomainError> {
        let active_query = LineQuery::orders_of(buyer.user_id, LineStatus::Active);
        let active = self.store.query_lines(active_query.clone()).await?;
        let delivered = self
            .store
            .query_lines(LineQuery::orders_of(buyer.user_id, LineStatus::Delivered))
            .await?;
        let totals = self.store.line_totals(active_query).await?;

        Ok(OrderHistory {
            active,
            delivered,
            totals,
        })
    }
}
