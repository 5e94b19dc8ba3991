//! Subscription service over the transactional ledger.

use sqlx::PgPool;

use shopnear_core::{ShopId, UserId};

use crate::db::subscriptions::LedgerError;
use crate::db::{RepositoryError, SubscriptionLedger};
use crate::models::Shop;

/// Subscribe/unsubscribe operations and their read-only conveniences.
pub struct SubscriptionService<'a> {
    ledger: SubscriptionLedger<'a>,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            ledger: SubscriptionLedger::new(pool),
        }
    }

    /// Subscribe a user to a shop; returns the new subscriber count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadySubscribed` if the edge already exists,
    /// `LedgerError::ShopNotFound` if the shop doesn't exist.
    pub async fn subscribe(&self, shop_id: ShopId, user_id: UserId) -> Result<i64, LedgerError> {
        self.ledger.subscribe(shop_id, user_id).await
    }

    /// Unsubscribe a user from a shop; returns the new subscriber count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotSubscribed` if no edge exists,
    /// `LedgerError::ShopNotFound` if the shop doesn't exist.
    pub async fn unsubscribe(&self, shop_id: ShopId, user_id: UserId) -> Result<i64, LedgerError> {
        self.ledger.unsubscribe(shop_id, user_id).await
    }

    /// A shop plus whether the user is subscribed to it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn shop_details(
        &self,
        shop_id: ShopId,
        user_id: UserId,
    ) -> Result<(Shop, bool), RepositoryError> {
        self.ledger.shop_details(shop_id, user_id).await
    }
}
