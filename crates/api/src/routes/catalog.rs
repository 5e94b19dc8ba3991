//! Catalog route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::extract::{Json, Query};
use crate::middleware::CurrentAdmin;
use crate::response;
use crate::services::CatalogService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// New catalog entry payload.
#[derive(Debug, Deserialize)]
pub struct CreateCatalogProductRequest {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Suggestion query string.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub keyword: String,
    pub limit: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/catalog-products`
///
/// The catalog is platform-curated, so creation sits behind the admin gate.
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(dto): Json<CreateCatalogProductRequest>,
) -> Result<Response> {
    let product = CatalogService::new(state.pool())
        .create(
            &dto.name,
            &dto.brand,
            &dto.category,
            &dto.description,
            &dto.image_url,
        )
        .await?;

    Ok(response::success(
        StatusCode::CREATED,
        "Catalog product created successfully",
        json!({"product": product}),
    ))
}

/// `GET /api/catalog-products/suggest?keyword=..&limit=..`
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Response> {
    let products = CatalogService::new(state.pool())
        .suggest(&query.keyword, query.limit)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Catalog products retrieved successfully",
        json!({"products": products}),
    ))
}
