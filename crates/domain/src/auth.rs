//! Identity and capability checks.
//!
//! Every mutating operation runs two checks: the caller is authenticated,
//! and the caller owns the resource being changed. Both live here so the
//! handlers never compare owners inline.

use common::UserId;
use serde::{Deserialize, Serialize};
use store::{CartLine, Item, LineView};

use crate::error::DomainError;

/// Coarse role supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Customer,
    /// May list items for sale and fulfill orders for them.
    Seller,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    /// Creates a customer identity.
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    /// Creates a seller identity.
    pub fn seller(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Seller,
        }
    }

    /// Turns an optional identity into a required one.
    pub fn require(identity: Option<Identity>) -> Result<Identity, DomainError> {
        identity.ok_or(DomainError::Unauthenticated)
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

/// Things that belong to exactly one user.
pub trait Owned {
    fn owner(&self) -> UserId;
}

impl Owned for Item {
    fn owner(&self) -> UserId {
        self.created_by
    }
}

impl Owned for CartLine {
    fn owner(&self) -> UserId {
        self.buyer_id
    }
}

/// Fulfillment of a line belongs to the seller of its item.
impl Owned for LineView {
    fn owner(&self) -> UserId {
        self.item.created_by
    }
}

/// Mutations that need a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DeleteCartLine,
    UpdateItem,
    DeleteItem,
    UpdateStatus,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::DeleteCartLine => "delete cart line",
            Action::UpdateItem => "update item",
            Action::DeleteItem => "delete item",
            Action::UpdateStatus => "update order status",
        }
    }
}

/// Allows `action` on `resource` only for its owner.
pub fn authorize<R: Owned + ?Sized>(
    identity: &Identity,
    resource: &R,
    action: Action,
) -> Result<(), DomainError> {
    if resource.owner() == identity.user_id {
        Ok(())
    } else {
        tracing::debug!(user = %identity.user_id, action = action.as_str(), "authorization denied");
        Err(DomainError::Forbidden {
            action: action.as_str(),
        })
    }
}

/// Allows seller-only screens for sellers.
pub fn require_seller(identity: &Identity, action: &'static str) -> Result<(), DomainError> {
    if identity.is_seller() {
        Ok(())
    } else {
        Err(DomainError::Forbidden { action })
    }
}
