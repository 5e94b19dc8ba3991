//! Catalog and shop-product domain types.
//!
//! The catalog is a shared, platform-curated product registry; shops attach
//! their own price/stock listings to catalog entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shopnear_core::{CatalogProductId, ShopId, ShopProductId};

/// A platform-curated catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogProduct {
    /// Unique catalog entry ID.
    pub id: CatalogProductId,
    /// Product name.
    pub name: String,
    /// Brand name, if any.
    pub brand: String,
    /// Product category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Image URL, if any.
    pub image_url: String,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shop's listing of a catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct ShopProduct {
    /// Unique listing ID.
    pub id: ShopProductId,
    /// Shop that owns the listing.
    pub shop_id: ShopId,
    /// Catalog entry the listing is backed by.
    pub catalog_id: CatalogProductId,
    /// Price per unit.
    pub price: Decimal,
    /// Units in stock.
    pub stock: i32,
    /// Whether the listing is currently purchasable.
    pub is_available: bool,
    /// Discount percentage applied to `price`.
    pub discount: Decimal,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shop product joined with its catalog entry, as returned by listings.
#[derive(Debug, Clone, Serialize)]
pub struct ShopProductDetail {
    /// The shop's listing.
    #[serde(flatten)]
    pub product: ShopProduct,
    /// The catalog entry backing it.
    pub catalog_product: CatalogProduct,
}
