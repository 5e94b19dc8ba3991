//! Shop repository for database operations.
//!
//! Besides the keyed lookups this module serves the proximity-search
//! candidate query: a latitude/longitude bounding-box prefilter that the
//! service layer refines with exact geodesic distances.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopnear_core::{Email, ShopId, geo::BoundingBox};

use super::RepositoryError;
use crate::models::Shop;

/// Raw `shops` row.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i32,
    name: String,
    owner_name: String,
    email: String,
    mobile: String,
    shop_type: String,
    supports_delivery: bool,
    address: String,
    latitude: f64,
    longitude: f64,
    password_hash: String,
    is_open: bool,
    subscriber_count: i64,
    created_at: DateTime<Utc>,
}

const SHOP_COLUMNS: &str = "id, name, owner_name, email, mobile, shop_type, supports_delivery, \
     address, latitude, longitude, password_hash, is_open, subscriber_count, created_at";

impl ShopRow {
    fn into_domain(self) -> Result<(Shop, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            Shop {
                id: ShopId::new(self.id),
                name: self.name,
                owner_name: self.owner_name,
                email,
                mobile: self.mobile,
                shop_type: self.shop_type,
                supports_delivery: self.supports_delivery,
                address: self.address,
                latitude: self.latitude,
                longitude: self.longitude,
                is_open: self.is_open,
                subscriber_count: self.subscriber_count,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// A proximity-search candidate before exact distance filtering.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopCandidate {
    /// Shop ID.
    pub id: i32,
    /// Shop display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a shop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| r.into_domain().map(|(shop, _)| shop)).transpose()
    }

    /// Get a shop and its password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Shop, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(ShopRow::into_domain).transpose()
    }

    /// Create a new shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        owner_name: &str,
        email: &Email,
        mobile: &str,
        shop_type: &str,
        supports_delivery: bool,
        address: &str,
        latitude: f64,
        longitude: f64,
        password_hash: &str,
    ) -> Result<Shop, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r"
            INSERT INTO shops
                (name, owner_name, email, mobile, shop_type, supports_delivery,
                 address, latitude, longitude, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SHOP_COLUMNS}
            "
        ))
        .bind(name)
        .bind(owner_name)
        .bind(email.as_str())
        .bind(mobile)
        .bind(shop_type)
        .bind(supports_delivery)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_domain().map(|(shop, _)| shop)
    }

    /// Set a shop's open/closed status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(&self, id: ShopId, is_open: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE shops SET is_open = $1 WHERE id = $2")
            .bind(is_open)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fetch proximity-search candidates inside a degree bounding box.
    ///
    /// The box over-approximates the search circle; exact geodesic filtering,
    /// ordering, and the result cap happen in the service layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn candidates_in_box(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<ShopCandidate>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopCandidate>(
            r"
            SELECT id, name, address, latitude, longitude
            FROM shops
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            ",
        )
        .bind(bbox.min_latitude)
        .bind(bbox.max_latitude)
        .bind(bbox.min_longitude)
        .bind(bbox.max_longitude)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
