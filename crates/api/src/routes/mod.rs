//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check (db ping)
//!
//! # User auth & account
//! POST   /auth/register                - Register user (sets auth cookie)
//! POST   /auth/login                   - Login user (sets auth cookie)
//! GET    /auth/me                      - Current user profile
//! POST   /auth/logout                  - Clear auth cookie
//! POST   /auth/change-password         - Rotate password
//! DELETE /auth/delete-account          - Delete account
//!
//! # Shop owner
//! POST   /shop/register                - Register shop (sets auth cookie)
//! POST   /shop/login                   - Login shop (sets auth cookie)
//! GET    /shop/profile                 - Shop profile
//! PATCH  /shop/status                  - Set open/closed
//! POST   /shop/products                - Add product listing
//! GET    /shop/products                - List own listings
//! GET    /shop/products/{id}           - Listing by id
//! PUT    /shop/products                - Update listing
//! DELETE /shop/products/{id}           - Delete listing
//!
//! # Discovery & subscriptions (user-gated)
//! GET    /shops                        - Proximity search (lat/lon/radius/limit)
//! GET    /shops/{id}                   - Shop details + is_subscribed
//! POST   /shops/{id}/subscribe         - Subscribe
//! POST   /shops/{id}/unsubscribe       - Unsubscribe
//! GET    /shops/{id}/products          - A shop's available listings
//! GET    /user/subscriptions           - Shops the user subscribes to
//!
//! # Catalog
//! POST   /api/catalog-products         - Create catalog entry (admin-gated)
//! GET    /api/catalog-products/suggest - Keyword suggestions
//! ```

pub mod auth;
pub mod catalog;
pub mod discovery;
pub mod shops;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::Response;
use axum::routing::{delete, get, patch, post};
use axum::{Router, extract::State};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::response;
use crate::state::AppState;

/// Create the user auth/account routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/delete-account", delete(auth::delete_account))
}

/// Create the shop-owner routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(shops::register))
        .route("/login", post(shops::login))
        .route("/profile", get(shops::profile))
        .route("/status", patch(shops::update_status))
        .route(
            "/products",
            post(shops::add_product)
                .get(shops::list_products)
                .put(shops::update_product),
        )
        .route(
            "/products/{id}",
            get(shops::get_product).delete(shops::delete_product),
        )
}

/// Create the discovery/subscription routes router.
pub fn discovery_routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(discovery::nearby_shops))
        .route("/shops/{id}", get(discovery::shop_details))
        .route("/shops/{id}/subscribe", post(discovery::subscribe))
        .route("/shops/{id}/unsubscribe", post(discovery::unsubscribe))
        .route("/shops/{id}/products", get(discovery::shop_products))
        .route("/user/subscriptions", get(discovery::user_subscriptions))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(catalog::create))
        .route("/suggest", get(catalog::suggest))
}

/// Assemble the full application router.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/shop", shop_routes())
        .merge(discovery_routes())
        .nest("/api/catalog-products", catalog_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Browser CORS policy: one configured origin, credentials allowed so the
/// auth cookie travels.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = HeaderValue::from_str(&state.config().cors_origin).unwrap_or_else(|_| {
        tracing::warn!(
            origin = %state.config().cors_origin,
            "invalid CORS origin, falling back to localhost"
        );
        HeaderValue::from_static("http://localhost:5173")
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => response::success(
            StatusCode::OK,
            "Service is healthy",
            serde_json::json!({"database": "up"}),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            response::failure(StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
        }
    }
}
