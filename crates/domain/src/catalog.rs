//! Seller-supplied item fields and their validation.

use chrono::{DateTime, Utc};
use common::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use store::{Item, Money};

use crate::error::ValidationError;

/// The editable fields of an item, as submitted by its seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    pub slug: String,
    pub price: Money,
    pub hours: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub labels: String,
    #[serde(default)]
    pub label_colour: String,
}

impl ItemDraft {
    /// Creates a draft with the required fields and empty descriptive text.
    pub fn new(title: impl Into<String>, slug: impl Into<String>, price: Money, hours: i32) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            price,
            hours,
            description: String::new(),
            instructions: String::new(),
            image: None,
            labels: String::new(),
            label_colour: String::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the draft before it reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if !is_valid_slug(&self.slug) {
            return Err(ValidationError::InvalidSlug(self.slug.clone()));
        }
        if self.price.is_negative() {
            return Err(ValidationError::NegativePrice(self.price));
        }
        if self.hours < 0 {
            return Err(ValidationError::NegativeHours(self.hours));
        }
        Ok(())
    }

    /// Builds a new item owned by `seller`.
    pub fn into_item(self, seller: UserId, now: DateTime<Utc>) -> Item {
        let mut item = Item {
            id: ItemId::new(),
            slug: String::new(),
            title: String::new(),
            price: Money::zero(),
            hours: 0,
            description: String::new(),
            instructions: String::new(),
            image: None,
            labels: String::new(),
            label_colour: String::new(),
            created_by: seller,
            created_at: now,
        };
        self.apply_to(&mut item);
        item
    }

    /// Overwrites the editable fields of `item`, leaving id and owner.
    pub fn apply_to(self, item: &mut Item) {
        item.title = self.title.trim().to_string();
        item.slug = self.slug;
        item.price = self.price;
        item.hours = self.hours;
        item.description = self.description;
        item.instructions = self.instructions;
        item.image = self.image;
        item.labels = self.labels;
        item.label_colour = self.label_colour;
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ItemDraft {
        ItemDraft::new("Deep clean", "deep-clean", Money::from_major(100), 3)
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn blank_title_rejected() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert_eq!(d.validate(), Err(ValidationError::EmptyField("title")));
    }

    #[test]
    fn slug_must_be_url_safe() {
        for bad in ["", "Deep-Clean", "deep clean", "deep/clean"] {
            let mut d = draft();
            d.slug = bad.to_string();
            assert_eq!(
                d.validate(),
                Err(ValidationError::InvalidSlug(bad.to_string()))
            );
        }
    }

    #[test]
    fn negative_price_and_hours_rejected() {
        let mut d = draft();
        d.price = Money::from_minor(-1);
        assert!(matches!(d.validate(), Err(ValidationError::NegativePrice(_))));

        let mut d = draft();
        d.hours = -2;
        assert_eq!(d.validate(), Err(ValidationError::NegativeHours(-2)));
    }

    #[test]
    fn zero_price_is_allowed() {
        let mut d = draft();
        d.price = Money::zero();
        d.hours = 0;
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn apply_keeps_identity_and_owner() {
        let seller = UserId::new();
        let mut item = draft().into_item(seller, Utc::now());
        let id = item.id;

        let mut edit = draft().description("now with windows");
        edit.price = Money::from_major(150);
        edit.apply_to(&mut item);

        assert_eq!(item.id, id);
        assert_eq!(item.created_by, seller);
        assert_eq!(item.price, Money::from_major(150));
        assert_eq!(item.description, "now with windows");
    }
}
