//! User-facing discovery and subscription route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::json;

use shopnear_core::ShopId;

use crate::error::{AppError, Result};
use crate::extract::{Path, Query};
use crate::middleware::CurrentUser;
use crate::models::Shop;
use crate::response;
use crate::services::shops::NearbyParams;
use crate::services::{ProductService, ShopService, SubscriptionService, UserService};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Proximity-search query string. Non-numeric values are rejected upstream
/// by the extractor, before any of this reaches the search component.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_radius() -> f64 {
    5000.0
}

const fn default_limit() -> u32 {
    10
}

/// Shop details plus the caller's subscription state.
#[derive(Debug, Serialize)]
pub struct ShopDetailsResponse {
    pub id: ShopId,
    pub name: String,
    #[serde(rename = "type")]
    pub shop_type: String,
    pub address: String,
    pub is_open: bool,
    pub subscriber_count: i64,
    pub is_subscribed: bool,
}

impl ShopDetailsResponse {
    fn from_shop(shop: Shop, is_subscribed: bool) -> Self {
        Self {
            id: shop.id,
            name: shop.name,
            shop_type: shop.shop_type,
            address: shop.address,
            is_open: shop.is_open,
            subscriber_count: shop.subscriber_count,
            is_subscribed,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /shops?lat=..&lon=..&radius=..&limit=..`
pub async fn nearby_shops(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<NearbyQuery>,
) -> Result<Response> {
    let shops = ShopService::new(state.pool())
        .find_nearby(NearbyParams {
            latitude: query.lat,
            longitude: query.lon,
            radius_meters: query.radius,
            limit: usize::try_from(query.limit).unwrap_or(usize::MAX),
        })
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Nearby shops retrieved successfully",
        shops,
    ))
}

/// `GET /shops/{id}`
pub async fn shop_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response> {
    let (shop, is_subscribed) = SubscriptionService::new(state.pool())
        .shop_details(ShopId::new(id), user.id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("shop".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(response::success(
        StatusCode::OK,
        "Shop details retrieved successfully",
        ShopDetailsResponse::from_shop(shop, is_subscribed),
    ))
}

/// `POST /shops/{id}/subscribe`
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response> {
    let subscriber_count = SubscriptionService::new(state.pool())
        .subscribe(ShopId::new(id), user.id)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Subscribed successfully",
        json!({"subscriber_count": subscriber_count}),
    ))
}

/// `POST /shops/{id}/unsubscribe`
pub async fn unsubscribe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response> {
    let subscriber_count = SubscriptionService::new(state.pool())
        .unsubscribe(ShopId::new(id), user.id)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Unsubscribed successfully",
        json!({"subscriber_count": subscriber_count}),
    ))
}

/// `GET /shops/{id}/products`
pub async fn shop_products(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response> {
    let shop_id = ShopId::new(id);

    // 404 for a missing shop, not an empty list.
    ShopService::new(state.pool())
        .get(shop_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("shop".to_owned()),
            other => AppError::Database(other),
        })?;

    let products = ProductService::new(state.pool()).list_public(shop_id).await?;

    Ok(response::success(
        StatusCode::OK,
        "Shop products retrieved successfully",
        products,
    ))
}

/// `GET /user/subscriptions`
pub async fn user_subscriptions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let shops = UserService::new(state.pool()).subscriptions(user.id).await?;

    Ok(response::success(
        StatusCode::OK,
        "Subscriptions retrieved successfully",
        shops,
    ))
}
