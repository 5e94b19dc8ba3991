//! Shop-product service: per-shop listings of catalog entries.

use rust_decimal::Decimal;
use sqlx::PgPool;

use shopnear_core::{CatalogProductId, ShopId, ShopProductId};

use crate::db::{RepositoryError, ShopProductRepository};
use crate::models::ShopProductDetail;

/// Price/stock fields of a listing mutation.
#[derive(Debug, Clone, Copy)]
pub struct ListingFields {
    pub price: Decimal,
    pub stock: i32,
    pub discount: Decimal,
    pub is_available: bool,
}

/// Listing management for shop owners plus public listing reads.
pub struct ProductService<'a> {
    products: ShopProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ShopProductRepository::new(pool),
        }
    }

    /// Add a listing for the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the catalog entry (or shop)
    /// doesn't exist.
    pub async fn add(
        &self,
        shop_id: ShopId,
        catalog_id: CatalogProductId,
        fields: ListingFields,
    ) -> Result<ShopProductId, RepositoryError> {
        self.products
            .add(
                shop_id,
                catalog_id,
                fields.price,
                fields.stock,
                fields.discount,
                fields.is_available,
            )
            .await
    }

    /// All of a shop's listings (owner view, including unavailable ones).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(
        &self,
        shop_id: ShopId,
    ) -> Result<Vec<ShopProductDetail>, RepositoryError> {
        self.products.list_by_shop(shop_id, false).await
    }

    /// A shop's available listings (public view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_public(
        &self,
        shop_id: ShopId,
    ) -> Result<Vec<ShopProductDetail>, RepositoryError> {
        self.products.list_by_shop(shop_id, true).await
    }

    /// One listing by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such listing exists.
    pub async fn get(&self, id: ShopProductId) -> Result<ShopProductDetail, RepositoryError> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a listing owned by the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist or
    /// belongs to another shop.
    pub async fn update(
        &self,
        shop_id: ShopId,
        id: ShopProductId,
        fields: ListingFields,
    ) -> Result<(), RepositoryError> {
        self.products
            .update(
                shop_id,
                id,
                fields.price,
                fields.stock,
                fields.discount,
                fields.is_available,
            )
            .await
    }

    /// Delete a listing owned by the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist or
    /// belongs to another shop.
    pub async fn delete(&self, shop_id: ShopId, id: ShopProductId) -> Result<(), RepositoryError> {
        self.products.delete(shop_id, id).await
    }
}
