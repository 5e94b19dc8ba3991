//! Uniform JSON response envelope.
//!
//! Every endpoint answers with the same shape: successes carry
//! `{success: true, message, data}` (data omitted when there is none) and
//! failures carry `{success: false, message, error}`. Handlers build
//! successes here; failures are built by [`crate::error::AppError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A success response with a payload.
pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(ApiResponse {
            success: true,
            message: message.to_owned(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// A success response without a payload.
pub fn success_empty(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: true,
            message: message.to_owned(),
            data: None,
        }),
    )
        .into_response()
}

/// A failure response. Handlers normally get this via `AppError`; it is
/// exposed for rejection types that bypass the error enum.
pub fn failure(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ApiErrorResponse {
            success: false,
            message: "Request failed".to_owned(),
            error: Some(error.to_owned()),
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse {
            success: true,
            message: "ok".to_owned(),
            data: Some(serde_json::json!({"id": 1})),
        })
        .unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "ok");
        assert_eq!(body["data"]["id"], 1);
    }

    #[test]
    fn test_empty_success_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()> {
            success: true,
            message: "ok".to_owned(),
            data: None,
        })
        .unwrap();

        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let body = serde_json::to_value(ApiErrorResponse {
            success: false,
            message: "Request failed".to_owned(),
            error: Some("boom".to_owned()),
        })
        .unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "boom");
    }
}
