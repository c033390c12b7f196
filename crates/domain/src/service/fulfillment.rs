use chrono::Utc;
use common::CartLineId;
use store::{CartLine, LineQuery, LineStatus, LineView, ShopStore, ShopStoreExt};

use super::ShopService;
use crate::auth::{Action, Identity, authorize, require_seller};
use crate::error::{DomainError, ValidationError};
use crate::views::SellerDashboard;

impl<S: ShopStore> ShopService<S> {
    /// Active lines for the seller's items, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_pending_orders(&self, seller: &Identity) -> Result<Vec<LineView>, DomainError> {
        require_seller(seller, "view pending orders")?;
        Ok(self
            .store
            .query_lines(
                LineQuery::sold_by(seller.user_id)
                    .status(LineStatus::Active)
                    .newest_first(),
            )
            .await?)
    }

    /// Delivered lines for the seller's items, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn delivered_orders(&self, seller: &Identity) -> Result<Vec<LineView>, DomainError> {
        require_seller(seller, "view delivered orders")?;
        Ok(self
            .store
            .query_lines(
                LineQuery::sold_by(seller.user_id)
                    .status(LineStatus::Delivered)
                    .newest_first(),
            )
            .await?)
    }

    /// Moves an active line of one of the seller's items to `Delivered`.
    ///
    /// `new_status` must name `Delivered`; anything else is rejected
    /// rather than ignored.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        seller: &Identity,
        line_id: CartLineId,
        new_status: &str,
    ) -> Result<CartLine, DomainError> {
        require_seller(seller, Action::UpdateStatus.as_str())?;

        let view = self
            .store
            .get_line_view(line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cart line", line_id))?;

        authorize(seller, &view, Action::UpdateStatus)?;

        let status = new_status
            .parse::<LineStatus>()
            .map_err(ValidationError::from)?;
        if status != LineStatus::Delivered {
            return Err(ValidationError::UnsupportedStatus(status).into());
        }

        let invalid = || DomainError::InvalidTransition {
            line: line_id.to_string(),
            reason: "only active orders can be delivered",
        };
        if !view.line.is_active() {
            return Err(invalid());
        }
        if !self
            .store
            .mark_delivered(line_id, seller.user_id, Utc::now())
            .await?
        {
            return Err(invalid());
        }

        metrics::counter!("shop_lines_delivered_total").increment(1);
        tracing::info!(line = %line_id, seller = %seller.user_id, "line delivered");

        self.store
            .get_line(line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cart line", line_id))
    }

    /// Status counts, revenue and per-item order counts for the seller.
    #[tracing::instrument(skip(self))]
    pub async fn seller_dashboard(&self, seller: &Identity) -> Result<SellerDashboard, DomainError> {
        require_seller(seller, "view seller dashboard")?;

        let sold = LineQuery::sold_by(seller.user_id);
        let active_count = self
            .store
            .count_lines(sold.clone().status(LineStatus::Active))
            .await?;
        let delivered_count = self
            .store
            .count_lines(sold.clone().status(LineStatus::Delivered))
            .await?;
        let revenue = self.store.line_totals(sold).await?.price;
        let item_counts = self.store.item_order_counts(seller.user_id).await?;

        Ok(SellerDashboard {
            active_count,
            delivered_count,
            revenue,
            item_counts,
        })
    }
}
