//! User directory service: registration, login, and account management.

use sqlx::PgPool;

use shopnear_core::{Email, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{SubscribedShop, User};
use crate::services::auth::{self, AuthError};

/// User registration/login and account operations.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyRegistered` if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        auth::validate_password(password)?;
        let password_hash = auth::hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, latitude, longitude)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` whether the email is unknown
    /// or the password is wrong - callers cannot tell the two apart.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        auth::verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Rotate a user's password after verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the old password is wrong,
    /// `AuthError::WeakPassword` if the new one is too weak.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let current_hash = self
            .users
            .password_hash_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        auth::verify_password(old_password, &current_hash)?;
        auth::validate_password(new_password)?;

        let new_hash = auth::hash_password(new_password)?;
        self.users.update_password_hash(user_id, &new_hash).await?;

        Ok(())
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the delete fails.
    pub async fn delete_account(&self, user_id: UserId) -> Result<(), AuthError> {
        self.users.delete(user_id).await?;
        Ok(())
    }

    /// Shops the user is subscribed to, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subscriptions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<SubscribedShop>, RepositoryError> {
        self.users.subscribed_shops(user_id).await
    }
}
