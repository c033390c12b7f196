pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{CartLineId, ItemId, ReviewId, UserId};
pub use error::{Result, StoreError};
pub use memory::InMemoryShopStore;
pub use model::{
    CartLine, Item, ItemOrderCount, LineStatus, LineView, Money, ParseStatusError, Review, Totals,
};
pub use postgres::PostgresShopStore;
pub use query::LineQuery;
pub use store::{ShopStore, ShopStoreExt};
