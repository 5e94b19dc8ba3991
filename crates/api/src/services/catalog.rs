//! Catalog service: platform-curated product entries and suggestions.

use sqlx::PgPool;

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::CatalogProduct;

/// Default number of keyword suggestions.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 10;

/// Catalog creation and keyword-suggestion operations.
pub struct CatalogService<'a> {
    catalog: CatalogRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
        }
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
        self.catalog
            .create(name, brand, category, description, image_url)
            .await
    }

    /// Case-insensitive keyword suggestions across name/brand/category/
    /// description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn suggest(
        &self,
        keyword: &str,
        limit: Option<i64>,
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_SUGGEST_LIMIT);

        self.catalog.suggest(keyword, limit).await
    }
}
