use chrono::Utc;
use common::ReviewId;
use store::{Item, Review, ShopStore};

use super::{REVIEWS_PER_ITEM, ShopService};
use crate::auth::{Action, Identity, authorize, require_seller};
use crate::catalog::ItemDraft;
use crate::error::{DomainError, ValidationError};
use crate::views::ItemDetail;

impl<S: ShopStore> ShopService<S> {
    /// Every item in the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>, DomainError> {
        Ok(self.store.list_items().await?)
    }

    /// An item and its newest reviews.
    #[tracing::instrument(skip(self))]
    pub async fn item_detail(&self, slug: &str) -> Result<ItemDetail, DomainError> {
        let item = self.item_by_slug(slug).await?;
        let reviews = self.store.latest_reviews(item.id, REVIEWS_PER_ITEM).await?;
        Ok(ItemDetail { item, reviews })
    }

    /// The items the seller has listed.
    #[tracing::instrument(skip(self))]
    pub async fn seller_items(&self, seller: &Identity) -> Result<Vec<Item>, DomainError> {
        require_seller(seller, "list own items")?;
        Ok(self.store.list_items_by_seller(seller.user_id).await?)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn create_item(
        &self,
        seller: &Identity,
        draft: ItemDraft,
    ) -> Result<Item, DomainError> {
        require_seller(seller, "create item")?;
        draft.validate()?;

        let item = draft.into_item(seller.user_id, Utc::now());
        self.store.insert_item(item.clone()).await?;

        tracing::info!(item = %item.id, slug = %item.slug, "item created");
        Ok(item)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn update_item(
        &self,
        seller: &Identity,
        slug: &str,
        draft: ItemDraft,
    ) -> Result<Item, DomainError> {
        let mut item = self.item_by_slug(slug).await?;
        authorize(seller, &item, Action::UpdateItem)?;
        draft.validate()?;

        draft.apply_to(&mut item);
        if !self.store.update_item(item.clone()).await? {
            return Err(DomainError::not_found("Item", slug));
        }
        Ok(item)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, seller: &Identity, slug: &str) -> Result<(), DomainError> {
        let item = self.item_by_slug(slug).await?;
        authorize(seller, &item, Action::DeleteItem)?;

        if !self.store.delete_item(item.id).await? {
            return Err(DomainError::not_found("Item", slug));
        }
        tracing::info!(item = %item.id, slug, "item deleted");
        Ok(())
    }

    /// Appends a review to an item.
    #[tracing::instrument(skip(self, text))]
    pub async fn add_review(
        &self,
        user: &Identity,
        item_slug: &str,
        text: &str,
    ) -> Result<Review, DomainError> {
        let item = self.item_by_slug(item_slug).await?;
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyField("review").into());
        }

        let review = Review {
            id: ReviewId::new(),
            user_id: user.user_id,
            item_id: item.id,
            slug: item.slug,
            body: text.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_review(review.clone()).await?;

        metrics::counter!("shop_reviews_added_total").increment(1);
        Ok(review)
    }

    async fn item_by_slug(&self, slug: &str) -> Result<Item, DomainError> {
        self.store
            .get_item_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Item", slug))
    }
}
