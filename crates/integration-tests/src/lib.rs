//! Shared helpers for Shopnear integration tests.
//!
//! The tests in `tests/` exercise a live stack. They require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p shopnear-cli -- migrate`)
//! - For the HTTP tests, the API server running
//!   (`cargo run -p shopnear-api`)
//!
//! Database-backed tests read `SHOPNEAR_DATABASE_URL` (fallback
//! `DATABASE_URL`); HTTP tests read `API_BASE_URL` (default
//! `http://localhost:8080`). All of them are `#[ignore]`d so `cargo test`
//! stays green without infrastructure.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use sqlx::PgPool;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Connect to the test database.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails; the
/// calling test is expected to be `#[ignore]`d for exactly that situation.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("SHOPNEAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOPNEAR_DATABASE_URL or DATABASE_URL must be set");

    shopnear_api::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database")
}

/// A process-unique email so tests can re-run without colliding on the
/// unique-email constraint.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}+{}-{nanos}-{n}@integration.test", std::process::id())
}

/// Insert a user row directly, returning its id.
pub async fn seed_user(pool: &PgPool, email: &str) -> i32 {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO users (name, email, password_hash, latitude, longitude)
        VALUES ('Test User', $1, 'x', 13.0827, 80.2707)
        RETURNING id
        ",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Insert a shop row directly at the given coordinates, returning its id.
pub async fn seed_shop(pool: &PgPool, email: &str, latitude: f64, longitude: f64) -> i32 {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO shops
            (name, owner_name, email, mobile, shop_type, address,
             latitude, longitude, password_hash)
        VALUES ('Test Shop', 'Test Owner', $1, '1234567890', 'grocery',
                '123 Test Street', $2, $3, 'x')
        RETURNING id
        ",
    )
    .bind(email)
    .bind(latitude)
    .bind(longitude)
    .fetch_one(pool)
    .await
    .expect("Failed to seed shop")
}

/// Direct row count of the subscription ledger for one shop.
pub async fn ledger_row_count(pool: &PgPool, shop_id: i32) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop_subscriptions WHERE shop_id = $1")
        .bind(shop_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count subscriptions")
}

/// The cached subscriber count on the shop row.
pub async fn cached_subscriber_count(pool: &PgPool, shop_id: i32) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT subscriber_count FROM shops WHERE id = $1")
        .bind(shop_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read subscriber_count")
}
