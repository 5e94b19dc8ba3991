//! Shop domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopnear_core::{Email, ShopId};

/// A registered shop.
///
/// `subscriber_count` is a cached value derived from the subscription ledger;
/// only the ledger's transaction protocol writes it.
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Name of the owning person.
    pub owner_name: String,
    /// Login email address.
    pub email: Email,
    /// Contact number.
    pub mobile: String,
    /// Category of shop (grocery, pharmacy, ...).
    #[serde(rename = "type")]
    pub shop_type: String,
    /// Whether the shop delivers.
    pub supports_delivery: bool,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Whether the shop is currently open for orders.
    pub is_open: bool,
    /// Cached count of subscription rows for this shop.
    pub subscriber_count: i64,
    /// When the shop registered.
    pub created_at: DateTime<Utc>,
}

/// A proximity-search result row.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyShop {
    /// Shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Geodesic distance from the query point, in meters.
    pub distance_meters: f64,
}

/// A shop as seen from a user's subscription list.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribedShop {
    /// Shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Category of shop.
    pub shop_type: String,
    /// Street address.
    pub address: String,
    /// Whether the shop is currently open.
    pub is_open: bool,
    /// When the user subscribed.
    pub subscribed_at: DateTime<Utc>,
}
