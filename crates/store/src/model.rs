//! Records held by the store: catalog items, reviews, and ledger lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CartLineId, ItemId, ReviewId, UserId};

/// Money amount in minor units (paise/cents) to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates an amount from minor units.
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units.
    pub fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Fulfillment status of an ordered line.
///
/// ```text
/// (cart) ──place_order──► Active ──mark_delivered──► Delivered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStatus {
    /// Ordered and awaiting fulfillment by the seller.
    Active,

    /// Fulfilled (terminal state).
    Delivered,
}

impl LineStatus {
    /// Returns the status name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Active => "Active",
            LineStatus::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that names no known [`LineStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown line status: {0:?}")]
pub struct ParseStatusError(pub String);

impl std::str::FromStr for LineStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(LineStatus::Active),
            "Delivered" => Ok(LineStatus::Delivered),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A sellable service with price and duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Unique, URL-stable identifier.
    pub slug: String,
    pub title: String,
    pub price: Money,
    /// Duration of the service in hours.
    pub hours: i32,
    pub description: String,
    pub instructions: String,
    /// Location of the item image; serving it is someone else's job.
    pub image: Option<String>,
    pub labels: String,
    pub label_colour: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// A buyer's review of an item. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Copy of the item slug for lookups by slug.
    pub slug: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One unit of one item associated with one buyer.
///
/// While `ordered` is false the line sits in the buyer's cart and
/// `status`, `ordered_date` and `delivery_date` are all unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub item_id: ItemId,
    pub buyer_id: UserId,
    pub quantity: i32,
    pub ordered: bool,
    pub status: Option<LineStatus>,
    pub ordered_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a fresh, unordered cart line.
    pub fn new(item_id: ItemId, buyer_id: UserId, quantity: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: CartLineId::new(),
            item_id,
            buyer_id,
            quantity,
            ordered: false,
            status: None,
            ordered_date: None,
            delivery_date: None,
            created_at: now,
        }
    }

    /// Returns true if the line is ordered and awaiting delivery.
    pub fn is_active(&self) -> bool {
        self.ordered && self.status == Some(LineStatus::Active)
    }
}

/// A ledger line joined with the item it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub line: CartLine,
    pub item: Item,
}

/// Sums over a set of ledger lines.
///
/// The price total counts the item price once per line, matching how the
/// cart and billing pages have always been computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub price: Money,
    pub quantity: i64,
    pub hours: i64,
}

impl Totals {
    /// Computes totals over already-loaded lines. Empty input yields zero.
    pub fn from_views<'a>(views: impl IntoIterator<Item = &'a LineView>) -> Self {
        views.into_iter().fold(Totals::default(), |acc, view| Totals {
            price: acc.price + view.item.price,
            quantity: acc.quantity + i64::from(view.line.quantity),
            hours: acc.hours + i64::from(view.item.hours),
        })
    }
}

/// Number of ordered lines for one of a seller's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOrderCount {
    pub item_id: ItemId,
    pub slug: String,
    pub title: String,
    pub orders: i64,
}
