//! Catalog-product repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopnear_core::CatalogProductId;

use super::RepositoryError;
use crate::models::CatalogProduct;

/// Raw `catalog_products` row.
#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i32,
    name: String,
    brand: String,
    category: String,
    description: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CatalogRow> for CatalogProduct {
    fn from(r: CatalogRow) -> Self {
        Self {
            id: CatalogProductId::new(r.id),
            name: r.name,
            brand: r.brand,
            category: r.category,
            description: r.description,
            image_url: r.image_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Repository for the shared product catalog.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        brand: &str,
        category: &str,
        description: &str,
        image_url: &str,
    ) -> Result<CatalogProduct, RepositoryError> {
        let row = sqlx::query_as::<_, CatalogRow>(
            r"
            INSERT INTO catalog_products (name, brand, category, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, brand, category, description, image_url, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(brand)
        .bind(category)
        .bind(description)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Keyword suggestions: case-insensitive substring match across name,
    /// brand, category, and description, ordered by name for stable results.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn suggest(
        &self,
        keyword: &str,
        limit: i64,
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let pattern = format!("%{keyword}%");

        let rows = sqlx::query_as::<_, CatalogRow>(
            r"
            SELECT id, name, brand, category, description, image_url, created_at, updated_at
            FROM catalog_products
            WHERE name ILIKE $1 OR brand ILIKE $1 OR category ILIKE $1 OR description ILIKE $1
            ORDER BY name ASC
            LIMIT $2
            ",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
