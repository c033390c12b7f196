use chrono::Utc;
use common::CartLineId;
use store::{CartLine, LineQuery, ShopStore};

use super::ShopService;
use crate::auth::{Action, Identity, authorize};
use crate::error::{DomainError, ValidationError};
use crate::views::CartView;

impl<S: ShopStore> ShopService<S> {
    /// Puts one line for the item into the buyer's cart.
    ///
    /// Every call adds a separate line, even for an item already in the
    /// cart. `quantity` defaults to 1.
    #[tracing::instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        buyer: &Identity,
        item_slug: &str,
        quantity: Option<i32>,
    ) -> Result<CartLine, DomainError> {
        let quantity = quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ValidationError::InvalidQuantity(quantity).into());
        }

        let item = self
            .store
            .get_item_by_slug(item_slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Item", item_slug))?;

        let line = CartLine::new(item.id, buyer.user_id, quantity, Utc::now());
        self.store.insert_line(line.clone()).await?;

        metrics::counter!("shop_cart_lines_added_total").increment(1);
        tracing::debug!(line = %line.id, item = %item.slug, "added to cart");
        Ok(line)
    }

    /// Lists the buyer's cart with price, quantity and hour totals.
    #[tracing::instrument(skip(self))]
    pub async fn view_cart(&self, buyer: &Identity) -> Result<CartView, DomainError> {
        let query = LineQuery::cart_of(buyer.user_id);
        let lines = self.store.query_lines(query.clone()).await?;
        let totals = self.store.line_totals(query).await?;
        Ok(CartView { lines, totals })
    }

    /// Removes a line from the buyer's own cart.
    #[tracing::instrument(skip(self))]
    pub async fn delete_cart_line(
        &self,
        buyer: &Identity,
        line_id: CartLineId,
    ) -> Result<(), DomainError> {
        let line = self
            .store
            .get_line(line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cart line", line_id))?;

        authorize(buyer, &line, Action::DeleteCartLine)?;

        if line.ordered || !self.store.delete_cart_line(line_id, buyer.user_id).await? {
            return Err(DomainError::InvalidTransition {
                line: line_id.to_string(),
                reason: "line has already been ordered",
            });
        }
        Ok(())
    }
}
