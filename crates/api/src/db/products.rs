//! Shop-product repository.
//!
//! Listings reference both a shop and a catalog entry; inserts and updates
//! verify both referents exist so a dangling id surfaces as `NotFound`
//! instead of a raw foreign-key error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shopnear_core::{CatalogProductId, ShopId, ShopProductId};

use super::RepositoryError;
use crate::models::{CatalogProduct, ShopProduct, ShopProductDetail};

/// Raw `shop_products` row joined with its catalog entry.
#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    id: i32,
    shop_id: i32,
    catalog_id: i32,
    price: Decimal,
    stock: i32,
    is_available: bool,
    discount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    catalog_name: String,
    catalog_brand: String,
    catalog_category: String,
    catalog_description: String,
    catalog_image_url: String,
    catalog_created_at: DateTime<Utc>,
    catalog_updated_at: DateTime<Utc>,
}

const DETAIL_COLUMNS: &str = "p.id, p.shop_id, p.catalog_id, p.price, p.stock, p.is_available, \
     p.discount, p.created_at, p.updated_at, \
     c.name AS catalog_name, c.brand AS catalog_brand, c.category AS catalog_category, \
     c.description AS catalog_description, c.image_url AS catalog_image_url, \
     c.created_at AS catalog_created_at, c.updated_at AS catalog_updated_at";

impl From<ProductDetailRow> for ShopProductDetail {
    fn from(r: ProductDetailRow) -> Self {
        Self {
            product: ShopProduct {
                id: ShopProductId::new(r.id),
                shop_id: ShopId::new(r.shop_id),
                catalog_id: CatalogProductId::new(r.catalog_id),
                price: r.price,
                stock: r.stock,
                is_available: r.is_available,
                discount: r.discount,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            catalog_product: CatalogProduct {
                id: CatalogProductId::new(r.catalog_id),
                name: r.catalog_name,
                brand: r.catalog_brand,
                category: r.catalog_category,
                description: r.catalog_description,
                image_url: r.catalog_image_url,
                created_at: r.catalog_created_at,
                updated_at: r.catalog_updated_at,
            },
        }
    }
}

/// Repository for per-shop product listings.
pub struct ShopProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopProductRepository<'a> {
    /// Create a new shop-product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a listing for `shop_id` backed by `catalog_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop or the catalog entry
    /// doesn't exist, `RepositoryError::Database` for other failures.
    pub async fn add(
        &self,
        shop_id: ShopId,
        catalog_id: CatalogProductId,
        price: Decimal,
        stock: i32,
        discount: Decimal,
        is_available: bool,
    ) -> Result<ShopProductId, RepositoryError> {
        self.require_catalog_entry(catalog_id).await?;

        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO shop_products (shop_id, catalog_id, price, stock, discount, is_available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(shop_id.as_i32())
        .bind(catalog_id.as_i32())
        .bind(price)
        .bind(stock)
        .bind(discount)
        .bind(is_available)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(ShopProductId::new(id))
    }

    /// List a shop's products with their catalog entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_shop(
        &self,
        shop_id: ShopId,
        only_available: bool,
    ) -> Result<Vec<ShopProductDetail>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {DETAIL_COLUMNS}
            FROM shop_products p
            JOIN catalog_products c ON c.id = p.catalog_id
            WHERE p.shop_id = $1 AND ($2 = FALSE OR p.is_available)
            ORDER BY p.id ASC
            "
        );

        let rows = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(shop_id.as_i32())
            .bind(only_available)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one listing with its catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ShopProductId,
    ) -> Result<Option<ShopProductDetail>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {DETAIL_COLUMNS}
            FROM shop_products p
            JOIN catalog_products c ON c.id = p.catalog_id
            WHERE p.id = $1
            "
        );

        let row = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Update a listing's price, stock, discount, and availability.
    ///
    /// Scoped to `shop_id` so an owner can only touch their own listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such listing belongs to the
    /// shop, `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        shop_id: ShopId,
        id: ShopProductId,
        price: Decimal,
        stock: i32,
        discount: Decimal,
        is_available: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop_products
            SET price = $1, stock = $2, discount = $3, is_available = $4, updated_at = NOW()
            WHERE id = $5 AND shop_id = $6
            ",
        )
        .bind(price)
        .bind(stock)
        .bind(discount)
        .bind(is_available)
        .bind(id.as_i32())
        .bind(shop_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a listing belonging to `shop_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such listing belongs to the
    /// shop, `RepositoryError::Database` for other failures.
    pub async fn delete(&self, shop_id: ShopId, id: ShopProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop_products WHERE id = $1 AND shop_id = $2")
            .bind(id.as_i32())
            .bind(shop_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Verify a catalog entry exists before inserting a listing against it.
    async fn require_catalog_entry(&self, id: CatalogProductId) -> Result<(), RepositoryError> {
        let exists = sqlx::query_scalar::<_, i32>("SELECT id FROM catalog_products WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
