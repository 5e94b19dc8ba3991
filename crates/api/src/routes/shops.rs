//! Shop-owner route handlers: registration, login, profile, status, and
//! product-listing management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use shopnear_core::{CatalogProductId, Role, ShopProductId};

use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::{CurrentShop, auth_cookie};
use crate::response;
use crate::services::products::ListingFields;
use crate::services::{ProductService, ShopService};
use crate::services::shops::NewShop;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Shop registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterShopRequest {
    pub name: String,
    pub owner_name: String,
    #[serde(rename = "type")]
    pub shop_type: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub supports_delivery: bool,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Open/closed status payload.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub is_open: bool,
}

/// New product-listing payload.
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub catalog_id: CatalogProductId,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Product-listing update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: ShopProductId,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /shop/register`
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(dto): Json<RegisterShopRequest>,
) -> Result<Response> {
    let shop = ShopService::new(state.pool())
        .register(NewShop {
            name: &dto.name,
            owner_name: &dto.owner_name,
            email: &dto.email,
            mobile: &dto.mobile,
            shop_type: &dto.shop_type,
            supports_delivery: dto.supports_delivery,
            address: &dto.address,
            latitude: dto.latitude,
            longitude: dto.longitude,
            password: &dto.password,
        })
        .await?;

    let token = state
        .tokens()
        .issue(i64::from(shop.id.as_i32()), Role::ShopOwner)?;
    let jar = jar.add(auth_cookie(
        token.clone(),
        state.config().cookie_domain.as_deref(),
    ));

    Ok((
        jar,
        response::success(
            StatusCode::CREATED,
            "Shop registered successfully",
            json!({"shop": shop, "token": token}),
        ),
    )
        .into_response())
}

/// `POST /shop/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(dto): Json<LoginRequest>,
) -> Result<Response> {
    let shop = ShopService::new(state.pool())
        .login(&dto.email, &dto.password)
        .await?;

    let token = state
        .tokens()
        .issue(i64::from(shop.id.as_i32()), Role::ShopOwner)?;
    let jar = jar.add(auth_cookie(
        token.clone(),
        state.config().cookie_domain.as_deref(),
    ));

    Ok((
        jar,
        response::success(
            StatusCode::OK,
            "Shop logged in successfully",
            json!({"shop": shop, "token": token}),
        ),
    )
        .into_response())
}

/// `GET /shop/profile`
pub async fn profile(CurrentShop(shop): CurrentShop) -> Response {
    response::success(StatusCode::OK, "Shop profile retrieved successfully", shop)
}

/// `PATCH /shop/status`
pub async fn update_status(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    Json(dto): Json<StatusRequest>,
) -> Result<Response> {
    ShopService::new(state.pool())
        .update_status(shop.id, dto.is_open)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Shop status updated successfully",
        json!({"is_open": dto.is_open}),
    ))
}

/// `POST /shop/products`
pub async fn add_product(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    Json(dto): Json<AddProductRequest>,
) -> Result<Response> {
    let id = ProductService::new(state.pool())
        .add(
            shop.id,
            dto.catalog_id,
            ListingFields {
                price: dto.price,
                stock: dto.stock,
                discount: dto.discount,
                is_available: dto.is_available,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("catalog product".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(response::success(
        StatusCode::CREATED,
        "product added successfully",
        json!({"id": id}),
    ))
}

/// `GET /shop/products`
pub async fn list_products(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
) -> Result<Response> {
    let products = ProductService::new(state.pool())
        .list_for_owner(shop.id)
        .await?;

    Ok(response::success(
        StatusCode::OK,
        "Products retrieved successfully",
        products,
    ))
}

/// `GET /shop/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    Path(id): Path<i32>,
) -> Result<Response> {
    let detail = ProductService::new(state.pool())
        .get(ShopProductId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("product".to_owned()),
            other => AppError::Database(other),
        })?;

    // Listings are only visible to the shop that owns them here.
    if detail.product.shop_id != shop.id {
        return Err(AppError::NotFound("product".to_owned()));
    }

    Ok(response::success(
        StatusCode::OK,
        "Product retrieved successfully",
        detail,
    ))
}

/// `PUT /shop/products`
pub async fn update_product(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    Json(dto): Json<UpdateProductRequest>,
) -> Result<Response> {
    ProductService::new(state.pool())
        .update(
            shop.id,
            dto.id,
            ListingFields {
                price: dto.price,
                stock: dto.stock,
                discount: dto.discount,
                is_available: dto.is_available,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("product".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(response::success_empty(
        StatusCode::OK,
        "product updated successfully",
    ))
}

/// `DELETE /shop/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentShop(shop): CurrentShop,
    Path(id): Path<i32>,
) -> Result<Response> {
    ProductService::new(state.pool())
        .delete(shop.id, ShopProductId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("product".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(response::success_empty(
        StatusCode::OK,
        "product deleted successfully",
    ))
}
