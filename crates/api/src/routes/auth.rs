//! User authentication and account route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use shopnear_core::Role;

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::{CurrentUser, auth_cookie, clear_auth_cookie};
use crate::response;
use crate::services::UserService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// User registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password-change payload.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(dto): Json<RegisterRequest>,
) -> Result<Response> {
    let user = UserService::new(state.pool())
        .register(
            &dto.name,
            &dto.email,
            &dto.password,
            dto.latitude,
            dto.longitude,
        )
        .await?;

    let token = state
        .tokens()
        .issue(i64::from(user.id.as_i32()), Role::User)?;
    let jar = jar.add(auth_cookie(
        token.clone(),
        state.config().cookie_domain.as_deref(),
    ));

    Ok((
        jar,
        response::success(
            StatusCode::CREATED,
            "User registered successfully",
            json!({
                "user": {"id": user.id, "email": user.email, "name": user.name},
                "token": token,
            }),
        ),
    )
        .into_response())
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(dto): Json<LoginRequest>,
) -> Result<Response> {
    let user = UserService::new(state.pool())
        .login(&dto.email, &dto.password)
        .await?;

    let token = state
        .tokens()
        .issue(i64::from(user.id.as_i32()), Role::User)?;
    let jar = jar.add(auth_cookie(
        token.clone(),
        state.config().cookie_domain.as_deref(),
    ));

    Ok((
        jar,
        response::success(
            StatusCode::OK,
            "User logged in successfully",
            json!({
                "user": {"id": user.id, "email": user.email, "name": user.name},
                "token": token,
            }),
        ),
    )
        .into_response())
}

/// `GET /auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Response {
    response::success(
        StatusCode::OK,
        "User profile retrieved successfully",
        json!({"id": user.id, "name": user.name, "email": user.email}),
    )
}

/// `POST /auth/logout`
///
/// Tokens are stateless and never revoked server-side; logout just clears
/// the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    CurrentUser(_user): CurrentUser,
) -> Response {
    let jar = jar.add(clear_auth_cookie(state.config().cookie_domain.as_deref()));

    (
        jar,
        response::success_empty(StatusCode::OK, "Successfully logged out"),
    )
        .into_response()
}

/// `POST /auth/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(dto): Json<ChangePasswordRequest>,
) -> Result<Response> {
    UserService::new(state.pool())
        .change_password(user.id, &dto.old_password, &dto.new_password)
        .await?;

    Ok(response::success_empty(
        StatusCode::OK,
        "Password changed successfully",
    ))
}

/// `DELETE /auth/delete-account`
pub async fn delete_account(
    State(state): State<AppState>,
    jar: CookieJar,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    UserService::new(state.pool()).delete_account(user.id).await?;

    let jar = jar.add(clear_auth_cookie(state.config().cookie_domain.as_deref()));

    Ok((
        jar,
        response::success_empty(StatusCode::OK, "Account deleted successfully"),
    )
        .into_response())
}
