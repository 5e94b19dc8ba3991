//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopnear_core::{Email, UserId};

use super::RepositoryError;
use crate::models::{SubscribedShop, User};

/// Raw `users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    latitude: f64,
    longitude: f64,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            User {
                id: UserId::new(self.id),
                name: self.name,
                email,
                latitude: self.latitude,
                longitude: self.longitude,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, latitude, longitude, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| r.into_domain().map(|(user, _)| user)).transpose()
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no user with that email exists; credential checking
    /// treats that identically to a failed password comparison.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, latitude, longitude, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_hash, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, latitude, longitude, created_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_domain().map(|(user, _)| user)
    }

    /// Get a user's password hash by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn password_hash_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(hash)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $1
            WHERE id = $2
            ",
        )
        .bind(password_hash)
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a user account.
    ///
    /// The foreign-key cascade removes the user's subscription rows, so the
    /// affected shops' cached counters are re-derived in the same
    /// transaction; shop rows are locked in id order, matching the ledger's
    /// locking, before the cascade fires.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let shop_ids: Vec<i32> = sqlx::query_scalar(
            "SELECT shop_id FROM shop_subscriptions WHERE user_id = $1 ORDER BY shop_id",
        )
        .bind(id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        if !shop_ids.is_empty() {
            sqlx::query("SELECT id FROM shops WHERE id = ANY($1) ORDER BY id FOR UPDATE")
                .bind(&shop_ids)
                .fetch_all(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        super::SubscriptionLedger::recount_shops(&mut tx, &shop_ids).await?;

        tx.commit().await?;

        Ok(())
    }

    /// List the shops a user is subscribed to, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subscribed_shops(
        &self,
        id: UserId,
    ) -> Result<Vec<SubscribedShop>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            name: String,
            shop_type: String,
            address: String,
            is_open: bool,
            subscribed_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r"
            SELECT s.id, s.name, s.shop_type, s.address, s.is_open,
                   sub.created_at AS subscribed_at
            FROM shop_subscriptions sub
            JOIN shops s ON s.id = sub.shop_id
            WHERE sub.user_id = $1
            ORDER BY sub.created_at DESC
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubscribedShop {
                id: shopnear_core::ShopId::new(r.id),
                name: r.name,
                shop_type: r.shop_type,
                address: r.address,
                is_open: r.is_open,
                subscribed_at: r.subscribed_at,
            })
            .collect())
    }
}
