//! Domain layer for the ordering service.
//!
//! This crate provides:
//! - identity, roles and the single ownership check used by every mutation
//! - the error taxonomy surfaced to callers
//! - item drafts and their validation
//! - [`ShopService`], the cart → order → delivered workflow
//! - contact-form inquiries and the mail collaborator interface

pub mod auth;
pub mod catalog;
pub mod contact;
pub mod error;
pub mod service;
pub mod views;

pub use auth::{Action, Identity, Owned, Role, authorize, require_seller};
pub use catalog::ItemDraft;
pub use contact::{
    ContactForm, ContactService, INQUIRY_SUBJECT, LogNotifier, MailMessage, Mailbox, Notifier,
    NotifyError,
};
pub use error::{DomainError, ValidationError};
pub use service::{REVIEWS_PER_ITEM, ShopService};
pub use views::{CartView, ItemDetail, OrderHistory, SellerDashboard};

pub use store::{
    CartLine, CartLineId, Item, ItemId, ItemOrderCount, LineStatus, LineView, Money, Review,
    ReviewId, Totals, UserId,
};
