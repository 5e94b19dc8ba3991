//! Authentication guards and cookie helpers.
//!
//! Each gate is an extractor: it pulls the token from the `Authorization`
//! cookie, verifies it with the codec, checks the embedded role against the
//! role the gate requires, and loads the matching directory row. The verified
//! principal is the extractor's payload - a typed value threaded to the
//! handler, not a dynamically-typed request attribute.
//!
//! All verification failures collapse into one generic 401; the specific
//! failure kind (missing cookie, bad signature, expired, role mismatch,
//! missing row) is logged at debug level only.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use shopnear_core::{Role, ShopId, UserId};

use crate::db::{ShopRepository, UserRepository};
use crate::models::{Shop, User};
use crate::response;
use crate::state::AppState;

/// Name of the cookie carrying the access token.
pub const AUTH_COOKIE: &str = "Authorization";

/// Extractor requiring a verified user principal.
pub struct CurrentUser(pub User);

/// Extractor requiring a verified shop-owner principal.
pub struct CurrentShop(pub Shop);

/// Extractor requiring a verified admin principal.
///
/// Admin is a role value on a user row, not a separate identity table, so
/// the payload is the underlying user.
pub struct CurrentAdmin(pub User);

/// Rejection produced by the guards.
pub enum AuthRejection {
    /// Missing/invalid/expired token, role mismatch, or missing row.
    Unauthorized,
    /// Storage failed while loading the principal row.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => response::failure(StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Internal => {
                response::failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Shared gate front half: cookie -> codec -> role check -> subject id.
fn verify_request(parts: &Parts, state: &AppState, required: Role) -> Result<i32, AuthRejection> {
    let jar = CookieJar::from_headers(&parts.headers);

    let token = jar.get(AUTH_COOKIE).ok_or_else(|| {
        tracing::debug!(gate = %required, "auth cookie missing");
        AuthRejection::Unauthorized
    })?;

    let (subject, role) = state.tokens().verify(token.value()).map_err(|e| {
        tracing::debug!(gate = %required, error = %e, "token verification failed");
        AuthRejection::Unauthorized
    })?;

    if role != required {
        tracing::debug!(gate = %required, presented = %role, "role mismatch");
        return Err(AuthRejection::Unauthorized);
    }

    i32::try_from(subject).map_err(|_| {
        tracing::debug!(gate = %required, subject, "subject id out of range");
        AuthRejection::Unauthorized
    })
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let subject = verify_request(parts, &state, Role::User)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(UserId::new(subject))
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for CurrentShop
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let subject = verify_request(parts, &state, Role::ShopOwner)?;

        let shop = ShopRepository::new(state.pool())
            .get_by_id(ShopId::new(subject))
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(shop))
    }
}

impl<S> FromRequestParts<S> for CurrentAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let subject = verify_request(parts, &state, Role::Admin)?;

        // Admins live in the user table; only the role claim differs.
        let user = UserRepository::new(state.pool())
            .get_by_id(UserId::new(subject))
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(user))
    }
}

/// Build the auth cookie set at login/registration.
pub fn auth_cookie(token: String, domain: Option<&str>) -> Cookie<'static> {
    let mut builder = Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");

    if let Some(domain) = domain {
        builder = builder.domain(domain.to_owned());
    }

    builder.build()
}

/// Build the expired cookie that clears the token at logout.
pub fn clear_auth_cookie(domain: Option<&str>) -> Cookie<'static> {
    let mut cookie = auth_cookie(String::new(), domain);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("tok".to_owned(), Some("shopnear.example"));
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("shopnear.example"));
    }

    #[test]
    fn test_auth_cookie_without_domain() {
        let cookie = auth_cookie("tok".to_owned(), None);
        assert_eq!(cookie.domain(), None);
    }

    #[test]
    fn test_clear_cookie_is_expired() {
        let cookie = clear_auth_cookie(None);
        assert_eq!(cookie.value(), "");
        // Removal cookies carry Max-Age: 0.
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
    }
}
