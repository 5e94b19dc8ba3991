//! Service layer: domain logic between the HTTP handlers and the
//! repositories.

pub mod auth;
pub mod catalog;
pub mod products;
pub mod shops;
pub mod subscriptions;
pub mod token;
pub mod users;

pub use auth::AuthError;
pub use catalog::CatalogService;
pub use products::ProductService;
pub use shops::ShopService;
pub use subscriptions::SubscriptionService;
pub use token::{TokenCodec, TokenError};
pub use users::UserService;
