//! Database operations for the Shopnear `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `users` - End-user accounts and credentials
//! - `shops` - Shop accounts, location, and the cached subscriber count
//! - `shop_subscriptions` - The subscription ledger (one row per edge)
//! - `catalog_products` - Platform-curated product catalog
//! - `shop_products` - Per-shop listings of catalog products
//!
//! All queries use runtime-checked sqlx with row structs mapped into domain
//! types. The only component allowed to write `shops.subscriber_count` is the
//! subscription ledger ([`subscriptions`]).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopnear-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod catalog;
pub mod products;
pub mod shops;
pub mod subscriptions;
pub mod users;

pub use catalog::CatalogRepository;
pub use products::ShopProductRepository;
pub use shops::ShopRepository;
pub use subscriptions::SubscriptionLedger;
pub use users::UserRepository;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
