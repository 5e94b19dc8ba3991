//! Domain models for the Shopnear API.
//!
//! These are validated domain objects, separate from database row types;
//! the repositories in [`crate::db`] map rows into them.

pub mod product;
pub mod shop;
pub mod user;

pub use product::{CatalogProduct, ShopProduct, ShopProductDetail};
pub use shop::{NearbyShop, Shop, SubscribedShop};
pub use user::User;
