//! Unified error handling.
//!
//! Provides a unified `AppError` type that logs server-side failures before
//! responding. All route handlers return `Result<T, AppError>`; nothing below
//! the handler layer touches HTTP types, and no raw storage error ever
//! reaches the client uninterpreted.
//!
//! Authentication failures are deliberately coarse: the client cannot tell a
//! malformed token from an expired one, or a wrong password from an unknown
//! email. The specific kind is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::db::subscriptions::LedgerError;
use crate::response;
use crate::services::{AuthError, TokenError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Credential/identity operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Subscription ledger operation failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Token issuance failed.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated for this operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AlreadyRegistered => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(err) => repository_status(err),
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Ledger(err) => match err {
                LedgerError::AlreadySubscribed | LedgerError::NotSubscribed => {
                    StatusCode::BAD_REQUEST
                }
                LedgerError::ShopNotFound => StatusCode::NOT_FOUND,
                LedgerError::Repository(err) => repository_status(err),
            },
            // Issuance is the only codec path reaching here; verification
            // failures surface as guard rejections.
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Database(err) => repository_message(err),
            Self::Internal(_) | Self::Token(_) => "Internal server error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "invalid credentials".to_owned(),
                AuthError::AlreadyRegistered => "an account with this email already exists".to_owned(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "invalid email address".to_owned(),
                AuthError::Repository(err) => repository_message(err),
                AuthError::PasswordHash => "Internal server error".to_owned(),
            },
            Self::Ledger(err) => match err {
                LedgerError::AlreadySubscribed => {
                    "user is already subscribed to this shop".to_owned()
                }
                LedgerError::NotSubscribed => "user is not subscribed to this shop".to_owned(),
                LedgerError::ShopNotFound => "shop not found".to_owned(),
                LedgerError::Repository(err) => repository_message(err),
            },
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(_) => "unauthorized".to_owned(),
            Self::InvalidParameter(msg) => msg.clone(),
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(err: &RepositoryError) -> String {
    match err {
        RepositoryError::NotFound => "not found".to_owned(),
        RepositoryError::Conflict(msg) => msg.clone(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            "Internal server error".to_owned()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        response::failure(status, &self.client_message())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("shop".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("nope".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::InvalidParameter("bad lat".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_map_coarsely() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AlreadyRegistered)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::WeakPassword("short".to_owned()))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_ledger_errors() {
        assert_eq!(
            get_status(AppError::Ledger(LedgerError::AlreadySubscribed)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Ledger(LedgerError::NotSubscribed)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Ledger(LedgerError::ShopNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_duplicate_email_is_conflict_not_internal() {
        let err = AppError::Database(RepositoryError::Conflict("email already exists".to_owned()));
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_failures_do_not_leak() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "user 17 has malformed email".to_owned(),
        ));
        assert_eq!(err.client_message(), "Internal server error");
    }
}
