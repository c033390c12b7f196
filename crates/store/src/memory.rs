use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    CartLine, CartLineId, Item, ItemId, ItemOrderCount, LineQuery, LineStatus, LineView, Result,
    Review, StoreError, Totals, UserId, store::ShopStore,
};

#[derive(Default)]
struct ShopState {
    items: Vec<Item>,
    reviews: Vec<Review>,
    lines: Vec<CartLine>,
}

impl ShopState {
    fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    fn slug_taken(&self, slug: &str, except: Option<ItemId>) -> bool {
        self.items
            .iter()
            .any(|i| i.slug == slug && Some(i.id) != except)
    }

    fn select(&self, query: &LineQuery) -> Vec<LineView> {
        let mut views: Vec<LineView> = self
            .lines
            .iter()
            .filter_map(|line| {
                let item = self.item(line.item_id)?;
                if let Some(buyer) = query.buyer
                    && line.buyer_id != buyer
                {
                    return None;
                }
                if let Some(seller) = query.seller
                    && item.created_by != seller
                {
                    return None;
                }
                if let Some(ordered) = query.ordered
                    && line.ordered != ordered
                {
                    return None;
                }
                if let Some(status) = query.status
                    && line.status != Some(status)
                {
                    return None;
                }
                Some(LineView {
                    line: line.clone(),
                    item: item.clone(),
                })
            })
            .collect();

        if query.newest_first {
            // Stable sort keeps insertion order as the final tie-break.
            views.sort_by(|a, b| {
                b.line
                    .ordered_date
                    .cmp(&a.line.ordered_date)
                    .then(b.line.created_at.cmp(&a.line.created_at))
            });
        }
        views
    }
}

/// In-memory shop store implementation for testing and local runs.
///
/// Provides the same interface as the PostgreSQL implementation. Every
/// mutation happens under a single write lock, so bulk updates are atomic
/// with respect to concurrent callers.
#[derive(Clone, Default)]
pub struct InMemoryShopStore {
    state: Arc<RwLock<ShopState>>,
}

impl InMemoryShopStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of ledger lines stored.
    pub async fn line_count(&self) -> usize {
        self.state.read().await.lines.len()
    }

    /// Returns a copy of every ledger line, in insertion order.
    pub async fn lines(&self) -> Vec<CartLine> {
        self.state.read().await.lines.clone()
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn insert_item(&self, item: Item) -> Result<()> {
        let mut state = self.state.write().await;
        if state.slug_taken(&item.slug, None) {
            return Err(StoreError::DuplicateSlug(item.slug));
        }
        state.items.push(item);
        Ok(())
    }

    async fn update_item(&self, item: Item) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.slug_taken(&item.slug, Some(item.id)) {
            return Err(StoreError::DuplicateSlug(item.slug));
        }
        let Some(existing) = state.items.iter_mut().find(|i| i.id == item.id) else {
            return Ok(false);
        };
        *existing = item.clone();
        for review in state.reviews.iter_mut().filter(|r| r.item_id == item.id) {
            review.slug.clone_from(&item.slug);
        }
        Ok(true)
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != item_id);
        if state.items.len() == before {
            return Ok(false);
        }
        state.lines.retain(|l| l.item_id != item_id);
        state.reviews.retain(|r| r.item_id != item_id);
        Ok(true)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        Ok(self.state.read().await.item(item_id).cloned())
    }

    async fn get_item_by_slug(&self, slug: &str) -> Result<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.slug == slug).cloned())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let mut items = self.state.read().await.items.clone();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    async fn list_items_by_seller(&self, seller: UserId) -> Result<Vec<Item>> {
        let state = self.state.read().await;
        let mut items: Vec<_> = state
            .items
            .iter()
            .filter(|i| i.created_by == seller)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    async fn insert_review(&self, review: Review) -> Result<()> {
        let mut state = self.state.write().await;
        if state.item(review.item_id).is_none() {
            return Err(StoreError::UnknownItem(review.item_id));
        }
        state.reviews.push(review);
        Ok(())
    }

    async fn latest_reviews(&self, item_id: ItemId, limit: usize) -> Result<Vec<Review>> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.item_id == item_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_line(&self, line: CartLine) -> Result<()> {
        let mut state = self.state.write().await;
        if state.item(line.item_id).is_none() {
            return Err(StoreError::UnknownItem(line.item_id));
        }
        state.lines.push(line);
        Ok(())
    }

    async fn get_line(&self, line_id: CartLineId) -> Result<Option<CartLine>> {
        let state = self.state.read().await;
        Ok(state.lines.iter().find(|l| l.id == line_id).cloned())
    }

    async fn delete_cart_line(&self, line_id: CartLineId, buyer: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.lines.len();
        state
            .lines
            .retain(|l| !(l.id == line_id && l.buyer_id == buyer && !l.ordered));
        Ok(state.lines.len() != before)
    }

    async fn query_lines(&self, query: LineQuery) -> Result<Vec<LineView>> {
        Ok(self.state.read().await.select(&query))
    }

    async fn line_totals(&self, query: LineQuery) -> Result<Totals> {
        let views = self.state.read().await.select(&query);
        Ok(Totals::from_views(&views))
    }

    async fn count_lines(&self, query: LineQuery) -> Result<u64> {
        Ok(self.state.read().await.select(&query).len() as u64)
    }

    async fn item_order_counts(&self, seller: UserId) -> Result<Vec<ItemOrderCount>> {
        let state = self.state.read().await;
        let mut counts: Vec<_> = state
            .items
            .iter()
            .filter(|i| i.created_by == seller)
            .map(|item| ItemOrderCount {
                item_id: item.id,
                slug: item.slug.clone(),
                title: item.title.clone(),
                orders: state
                    .lines
                    .iter()
                    .filter(|l| l.item_id == item.id && l.ordered)
                    .count() as i64,
            })
            .collect();
        counts.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(counts)
    }

    async fn place_order(&self, buyer: UserId, at: DateTime<Utc>) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut moved = 0;
        for line in state
            .lines
            .iter_mut()
            .filter(|l| l.buyer_id == buyer && !l.ordered)
        {
            line.ordered = true;
            line.status = Some(LineStatus::Active);
            line.ordered_date = Some(at);
            moved += 1;
        }
        Ok(moved)
    }

    async fn mark_delivered(
        &self,
        line_id: CartLineId,
        seller: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let owned: Vec<ItemId> = state
            .items
            .iter()
            .filter(|i| i.created_by == seller)
            .map(|i| i.id)
            .collect();
        let Some(line) = state
            .lines
            .iter_mut()
            .find(|l| l.id == line_id && l.is_active() && owned.contains(&l.item_id))
        else {
            return Ok(false);
        };
        line.status = Some(LineStatus::Delivered);
        line.delivery_date = Some(at);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{Money, ReviewId};

    fn create_test_item(seller: UserId, slug: &str, price: i64) -> Item {
        Item {
            id: ItemId::new(),
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            price: Money::from_major(price),
            hours: 2,
            description: "test".to_string(),
            instructions: String::new(),
            image: None,
            labels: String::new(),
            label_colour: String::new(),
            created_by: seller,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_item_by_slug() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "lawn-mowing", 100);
        store.insert_item(item.clone()).await.unwrap();

        let found = store.get_item_by_slug("lawn-mowing").await.unwrap();
        assert_eq!(found, Some(item));
        assert!(store.get_item_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_slug_rejected() {
        let store = InMemoryShopStore::new();
        let seller = UserId::new();
        store
            .insert_item(create_test_item(seller, "painting", 10))
            .await
            .unwrap();

        let result = store
            .insert_item(create_test_item(seller, "painting", 20))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateSlug(s)) if s == "painting"));
    }

    #[tokio::test]
    async fn update_to_taken_slug_rejected() {
        let store = InMemoryShopStore::new();
        let seller = UserId::new();
        let first = create_test_item(seller, "first", 10);
        let mut second = create_test_item(seller, "second", 10);
        store.insert_item(first).await.unwrap();
        store.insert_item(second.clone()).await.unwrap();

        second.slug = "first".to_string();
        assert!(matches!(
            store.update_item(second).await,
            Err(StoreError::DuplicateSlug(_))
        ));
    }

    #[tokio::test]
    async fn delete_item_cascades() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "tiling", 50);
        store.insert_item(item.clone()).await.unwrap();
        store
            .insert_line(CartLine::new(item.id, UserId::new(), 1, Utc::now()))
            .await
            .unwrap();
        store
            .insert_review(Review {
                id: ReviewId::new(),
                user_id: UserId::new(),
                item_id: item.id,
                slug: item.slug.clone(),
                body: "great".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(store.delete_item(item.id).await.unwrap());
        assert_eq!(store.line_count().await, 0);
        assert!(store.latest_reviews(item.id, 7).await.unwrap().is_empty());
        assert!(!store.delete_item(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn latest_reviews_newest_first_and_limited() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "plumbing", 50);
        store.insert_item(item.clone()).await.unwrap();
        for n in 0..10 {
            store
                .insert_review(Review {
                    id: ReviewId::new(),
                    user_id: UserId::new(),
                    item_id: item.id,
                    slug: item.slug.clone(),
                    body: format!("review {n}"),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let reviews = store.latest_reviews(item.id, 7).await.unwrap();
        assert_eq!(reviews.len(), 7);
        assert_eq!(reviews[0].body, "review 9");
        assert_eq!(reviews[6].body, "review 3");
    }

    #[tokio::test]
    async fn renaming_an_item_carries_its_reviews() {
        let store = InMemoryShopStore::new();
        let mut item = create_test_item(UserId::new(), "old", 50);
        store.insert_item(item.clone()).await.unwrap();
        store
            .insert_review(Review {
                id: ReviewId::new(),
                user_id: UserId::new(),
                item_id: item.id,
                slug: item.slug.clone(),
                body: "great".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        item.slug = "new".to_string();
        assert!(store.update_item(item.clone()).await.unwrap());
        let newcomer = create_test_item(UserId::new(), "old", 10);
        store.insert_item(newcomer.clone()).await.unwrap();

        let reviews = store.latest_reviews(item.id, 7).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].slug, "new");
        assert!(store.latest_reviews(newcomer.id, 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lines_and_reviews_need_an_existing_item() {
        let store = InMemoryShopStore::new();
        let missing = ItemId::new();

        let err = store
            .insert_line(CartLine::new(missing, UserId::new(), 1, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownItem(id) if id == missing));

        let err = store
            .insert_review(Review {
                id: ReviewId::new(),
                user_id: UserId::new(),
                item_id: missing,
                slug: "gone".to_string(),
                body: "hm".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownItem(_)));
        assert_eq!(store.line_count().await, 0);
    }

    #[tokio::test]
    async fn place_order_moves_only_that_buyers_cart() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "wiring", 100);
        store.insert_item(item.clone()).await.unwrap();
        let buyer = UserId::new();
        let other = UserId::new();
        store
            .insert_line(CartLine::new(item.id, buyer, 1, Utc::now()))
            .await
            .unwrap();
        store
            .insert_line(CartLine::new(item.id, buyer, 1, Utc::now()))
            .await
            .unwrap();
        store
            .insert_line(CartLine::new(item.id, other, 1, Utc::now()))
            .await
            .unwrap();

        let at = Utc::now();
        assert_eq!(store.place_order(buyer, at).await.unwrap(), 2);
        assert_eq!(store.place_order(buyer, at).await.unwrap(), 0);

        let active = store
            .query_lines(LineQuery::orders_of(buyer, LineStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|v| v.line.ordered_date == Some(at)));

        let other_cart = store.count_lines(LineQuery::cart_of(other)).await.unwrap();
        assert_eq!(other_cart, 1);
    }

    #[tokio::test]
    async fn newest_first_orders_by_ordered_date() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "roofing", 100);
        store.insert_item(item.clone()).await.unwrap();
        let buyer = UserId::new();

        let earlier = Utc::now() - Duration::hours(1);
        let first = CartLine::new(item.id, buyer, 1, earlier);
        store.insert_line(first.clone()).await.unwrap();
        store.place_order(buyer, earlier).await.unwrap();

        let second = CartLine::new(item.id, buyer, 1, Utc::now());
        store.insert_line(second.clone()).await.unwrap();
        store.place_order(buyer, Utc::now()).await.unwrap();

        let lines = store
            .query_lines(LineQuery::orders_of(buyer, LineStatus::Active))
            .await
            .unwrap();
        assert_eq!(lines[0].line.id, second.id);
        assert_eq!(lines[1].line.id, first.id);
    }

    #[tokio::test]
    async fn delete_cart_line_requires_buyer_and_unordered() {
        let store = InMemoryShopStore::new();
        let item = create_test_item(UserId::new(), "gardening", 10);
        store.insert_item(item.clone()).await.unwrap();
        let buyer = UserId::new();
        let line = CartLine::new(item.id, buyer, 1, Utc::now());
        store.insert_line(line.clone()).await.unwrap();

        assert!(!store.delete_cart_line(line.id, UserId::new()).await.unwrap());
        store.place_order(buyer, Utc::now()).await.unwrap();
        assert!(!store.delete_cart_line(line.id, buyer).await.unwrap());
        assert_eq!(store.line_count().await, 1);
    }

    #[tokio::test]
    async fn mark_delivered_guards_owner_and_status() {
        let store = InMemoryShopStore::new();
        let seller = UserId::new();
        let item = create_test_item(seller, "carpentry", 10);
        store.insert_item(item.clone()).await.unwrap();
        let buyer = UserId::new();
        let line = CartLine::new(item.id, buyer, 1, Utc::now());
        store.insert_line(line.clone()).await.unwrap();

        // Still in the cart.
        assert!(!store.mark_delivered(line.id, seller, Utc::now()).await.unwrap());

        store.place_order(buyer, Utc::now()).await.unwrap();
        assert!(
            !store
                .mark_delivered(line.id, UserId::new(), Utc::now())
                .await
                .unwrap()
        );
        assert!(store.mark_delivered(line.id, seller, Utc::now()).await.unwrap());
        assert!(!store.mark_delivered(line.id, seller, Utc::now()).await.unwrap());

        let stored = store.get_line(line.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Some(LineStatus::Delivered));
        assert!(stored.delivery_date.is_some());
    }

    #[tokio::test]
    async fn totals_and_counts_on_empty_store_are_zero() {
        let store = InMemoryShopStore::new();
        let buyer = UserId::new();
        assert_eq!(
            store.line_totals(LineQuery::cart_of(buyer)).await.unwrap(),
            Totals::default()
        );
        assert_eq!(store.count_lines(LineQuery::sold_by(buyer)).await.unwrap(), 0);
        assert!(store.item_order_counts(buyer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn item_order_counts_include_unsold_items() {
        let store = InMemoryShopStore::new();
        let seller = UserId::new();
        let sold = create_test_item(seller, "a-sold", 10);
        let unsold = create_test_item(seller, "b-unsold", 10);
        store.insert_item(sold.clone()).await.unwrap();
        store.insert_item(unsold.clone()).await.unwrap();
        let buyer = UserId::new();
        for _ in 0..3 {
            store
                .insert_line(CartLine::new(sold.id, buyer, 1, Utc::now()))
                .await
                .unwrap();
        }
        store.place_order(buyer, Utc::now()).await.unwrap();
        // An unordered line does not count.
        store
            .insert_line(CartLine::new(sold.id, buyer, 1, Utc::now()))
            .await
            .unwrap();

        let counts = store.item_order_counts(seller).await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].item_id, sold.id);
        assert_eq!(counts[0].orders, 3);
        assert_eq!(counts[1].item_id, unsold.id);
        assert_eq!(counts[1].orders, 0);
    }
}
