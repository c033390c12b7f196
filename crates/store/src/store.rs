use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    CartLine, CartLineId, Item, ItemId, ItemOrderCount, LineQuery, LineView, Result, Review,
    Totals, UserId,
};

/// Core trait for shop storage implementations.
///
/// Holds the catalog, the reviews, and the ledger of cart lines.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Inserts a new item.
    ///
    /// Fails with `DuplicateSlug` if another item already uses the slug.
    async fn insert_item(&self, item: Item) -> Result<()>;

    /// Replaces an existing item's fields.
    ///
    /// The slug copy on the item's reviews follows a slug change in the same
    /// write. Returns false if the item does not exist.
    async fn update_item(&self, item: Item) -> Result<bool>;

    /// Deletes an item together with its cart lines and reviews.
    ///
    /// Returns false if the item does not exist.
    async fn delete_item(&self, item_id: ItemId) -> Result<bool>;

    /// Retrieves an item by ID.
    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// Retrieves an item by slug.
    async fn get_item_by_slug(&self, slug: &str) -> Result<Option<Item>>;

    /// Lists every item, ordered by title.
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Lists the items a seller created, ordered by title.
    async fn list_items_by_seller(&self, seller: UserId) -> Result<Vec<Item>>;

    /// Appends a review.
    ///
    /// Fails with `UnknownItem` if the reviewed item does not exist.
    async fn insert_review(&self, review: Review) -> Result<()>;

    /// Retrieves the newest reviews of an item, newest first.
    async fn latest_reviews(&self, item_id: ItemId, limit: usize) -> Result<Vec<Review>>;

    /// Inserts a new ledger line.
    ///
    /// Fails with `UnknownItem` if the line's item does not exist.
    async fn insert_line(&self, line: CartLine) -> Result<()>;

    /// Retrieves a ledger line by ID.
    async fn get_line(&self, line_id: CartLineId) -> Result<Option<CartLine>>;

    /// Removes an unordered line belonging to `buyer`.
    ///
    /// Returns false if no such line exists.
    async fn delete_cart_line(&self, line_id: CartLineId, buyer: UserId) -> Result<bool>;

    /// Retrieves lines matching a query, joined with their items.
    async fn query_lines(&self, query: LineQuery) -> Result<Vec<LineView>>;

    /// Sums price, quantity and hours over lines matching a query.
    ///
    /// `limit` is ignored. An empty selection yields zero totals.
    async fn line_totals(&self, query: LineQuery) -> Result<Totals>;

    /// Counts lines matching a query. `limit` is ignored.
    async fn count_lines(&self, query: LineQuery) -> Result<u64>;

    /// Counts ordered lines per item for every item the seller owns.
    ///
    /// Items without orders are reported with a count of zero.
    async fn item_order_counts(&self, seller: UserId) -> Result<Vec<ItemOrderCount>>;

    /// Moves every unordered line of `buyer` to `Active` in one atomic update.
    ///
    /// Returns the number of lines moved.
    async fn place_order(&self, buyer: UserId, at: DateTime<Utc>) -> Result<u64>;

    /// Marks a line `Delivered` if it is active and its item belongs to
    /// `seller`, in one conditional update.
    ///
    /// Returns false if the guard did not match.
    async fn mark_delivered(
        &self,
        line_id: CartLineId,
        seller: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}

/// Extension trait providing convenience methods for shop stores.
#[async_trait]
pub trait ShopStoreExt: ShopStore {
    /// Loads a line together with its item.
    async fn get_line_view(&self, line_id: CartLineId) -> Result<Option<LineView>> {
        let Some(line) = self.get_line(line_id).await? else {
            return Ok(None);
        };
        Ok(self
            .get_item(line.item_id)
            .await?
            .map(|item| LineView { line, item }))
    }
}

impl<T: ShopStore + ?Sized> ShopStoreExt for T {}
