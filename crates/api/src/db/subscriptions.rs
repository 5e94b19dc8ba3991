//! The subscription ledger.
//!
//! One row per `(shop_id, user_id)` edge. The shop row's `subscriber_count`
//! is a cached derivation of this table and is written here and nowhere else.
//!
//! # Transaction protocol
//!
//! Every mutation runs as a single transaction that
//!
//! 1. locks the shop row (`SELECT ... FOR UPDATE`), serializing ledger
//!    mutations per shop,
//! 2. checks for an existing edge,
//! 3. inserts or deletes the edge,
//! 4. recomputes the subscriber count as `COUNT(*)` over the ledger - never
//!    an in-place increment,
//! 5. writes the recomputed count onto the shop row.
//!
//! Any failure rolls the whole transaction back, leaving ledger and counter
//! unchanged. The unique `(shop_id, user_id)` index is a storage backstop:
//! a unique violation surfacing from a lost race maps to `AlreadySubscribed`.

use sqlx::PgPool;

use shopnear_core::{ShopId, UserId};

use super::RepositoryError;
use crate::models::Shop;

/// Outcome-specific errors for ledger mutations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The `(shop, user)` edge already exists.
    #[error("already subscribed")]
    AlreadySubscribed,

    /// The `(shop, user)` edge does not exist.
    #[error("not subscribed")]
    NotSubscribed,

    /// The shop row does not exist.
    #[error("shop not found")]
    ShopNotFound,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Transactional access to the subscription ledger.
pub struct SubscriptionLedger<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionLedger<'a> {
    /// Create a new ledger handle.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe `user_id` to `shop_id`, returning the new subscriber count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ShopNotFound` if the shop doesn't exist,
    /// `LedgerError::AlreadySubscribed` if the edge already exists, and
    /// `LedgerError::Repository` for storage failures.
    pub async fn subscribe(&self, shop_id: ShopId, user_id: UserId) -> Result<i64, LedgerError> {
        let mut tx = self.pool.begin().await?;

        Self::lock_shop(&mut tx, shop_id).await?;

        let existing = Self::count_edge(&mut tx, shop_id, user_id).await?;
        if existing > 0 {
            return Err(LedgerError::AlreadySubscribed);
        }

        sqlx::query("INSERT INTO shop_subscriptions (shop_id, user_id) VALUES ($1, $2)")
            .bind(shop_id.as_i32())
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return LedgerError::AlreadySubscribed;
                }
                LedgerError::from(e)
            })?;

        let count = Self::write_back_count(&mut tx, shop_id).await?;

        tx.commit().await?;
        tracing::debug!(shop_id = %shop_id, user_id = %user_id, count, "subscribed");

        Ok(count)
    }

    /// Remove the `user_id` -> `shop_id` edge, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ShopNotFound` if the shop doesn't exist,
    /// `LedgerError::NotSubscribed` if no edge exists, and
    /// `LedgerError::Repository` for storage failures.
    pub async fn unsubscribe(&self, shop_id: ShopId, user_id: UserId) -> Result<i64, LedgerError> {
        let mut tx = self.pool.begin().await?;

        Self::lock_shop(&mut tx, shop_id).await?;

        let existing = Self::count_edge(&mut tx, shop_id, user_id).await?;
        if existing == 0 {
            return Err(LedgerError::NotSubscribed);
        }

        sqlx::query("DELETE FROM shop_subscriptions WHERE shop_id = $1 AND user_id = $2")
            .bind(shop_id.as_i32())
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        let count = Self::write_back_count(&mut tx, shop_id).await?;

        tx.commit().await?;
        tracing::debug!(shop_id = %shop_id, user_id = %user_id, count, "unsubscribed");

        Ok(count)
    }

    /// Whether the `(shop, user)` edge exists. Lock-free; may be slightly
    /// stale relative to a concurrently committing mutation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_subscribed(
        &self,
        shop_id: ShopId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop_subscriptions WHERE shop_id = $1 AND user_id = $2",
        )
        .bind(shop_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// A shop plus whether `user_id` is subscribed to it. Lock-free.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn shop_details(
        &self,
        shop_id: ShopId,
        user_id: UserId,
    ) -> Result<(Shop, bool), RepositoryError> {
        let shop = super::ShopRepository::new(self.pool)
            .get_by_id(shop_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let is_subscribed = self.is_subscribed(shop_id, user_id).await?;

        Ok((shop, is_subscribed))
    }

    /// Recompute and write back the cached count for each given shop, inside
    /// the caller's transaction. The shop rows must already be locked.
    ///
    /// Exists for the account-deletion path, where removing a user's edges
    /// touches several shops at once; counter writes still live in this
    /// module and nowhere else.
    pub(crate) async fn recount_shops(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        shop_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        for shop_id in shop_ids {
            let count = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM shop_subscriptions WHERE shop_id = $1",
            )
            .bind(shop_id)
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query("UPDATE shops SET subscriber_count = $1 WHERE id = $2")
                .bind(count)
                .bind(shop_id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Lock the shop row for the duration of the transaction.
    async fn lock_shop(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        shop_id: ShopId,
    ) -> Result<(), LedgerError> {
        let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM shops WHERE id = $1 FOR UPDATE")
            .bind(shop_id.as_i32())
            .fetch_optional(&mut **tx)
            .await?;

        if locked.is_none() {
            return Err(LedgerError::ShopNotFound);
        }

        Ok(())
    }

    /// Count rows for one `(shop, user)` edge inside the transaction.
    async fn count_edge(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        shop_id: ShopId,
        user_id: UserId,
    ) -> Result<i64, LedgerError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop_subscriptions WHERE shop_id = $1 AND user_id = $2",
        )
        .bind(shop_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }

    /// Recompute the shop's subscriber count from the ledger and write it
    /// onto the shop row, all inside the caller's transaction.
    async fn write_back_count(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        shop_id: ShopId,
    ) -> Result<i64, LedgerError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop_subscriptions WHERE shop_id = $1",
        )
        .bind(shop_id.as_i32())
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("UPDATE shops SET subscriber_count = $1 WHERE id = $2")
            .bind(count)
            .bind(shop_id.as_i32())
            .execute(&mut **tx)
            .await?;

        Ok(count)
    }
}
