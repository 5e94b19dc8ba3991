//! Shop directory service: registration, login, status, and proximity search.

use sqlx::PgPool;

use shopnear_core::{Coordinates, Email, ShopId};

use crate::db::{RepositoryError, ShopRepository};
use crate::db::shops::ShopCandidate;
use crate::models::{NearbyShop, Shop};
use crate::services::auth::{self, AuthError};

/// Parameters of a proximity search, already type-checked upstream.
#[derive(Debug, Clone, Copy)]
pub struct NearbyParams {
    /// Search-center latitude in decimal degrees.
    pub latitude: f64,
    /// Search-center longitude in decimal degrees.
    pub longitude: f64,
    /// Search radius in meters.
    pub radius_meters: f64,
    /// Maximum number of results.
    pub limit: usize,
}

/// Details for registering a shop.
#[derive(Debug)]
pub struct NewShop<'a> {
    pub name: &'a str,
    pub owner_name: &'a str,
    pub email: &'a str,
    pub mobile: &'a str,
    pub shop_type: &'a str,
    pub supports_delivery: bool,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub password: &'a str,
}

/// Shop registration/login and discovery operations.
pub struct ShopService<'a> {
    shops: ShopRepository<'a>,
}

impl<'a> ShopService<'a> {
    /// Create a new shop service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            shops: ShopRepository::new(pool),
        }
    }

    /// Register a new shop.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyRegistered` if the email is taken.
    pub async fn register(&self, details: NewShop<'_>) -> Result<Shop, AuthError> {
        let email = Email::parse(details.email)?;
        auth::validate_password(details.password)?;
        let password_hash = auth::hash_password(details.password)?;

        let shop = self
            .shops
            .create(
                details.name,
                details.owner_name,
                &email,
                details.mobile,
                details.shop_type,
                details.supports_delivery,
                details.address,
                details.latitude,
                details.longitude,
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        Ok(shop)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` whether the email is unknown
    /// or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Shop, AuthError> {
        let email = Email::parse(email)?;

        let (shop, password_hash) = self
            .shops
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        auth::verify_password(password, &password_hash)?;

        Ok(shop)
    }

    /// Get a shop by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn get(&self, id: ShopId) -> Result<Shop, RepositoryError> {
        self.shops
            .get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Set a shop's open/closed status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop doesn't exist.
    pub async fn update_status(&self, id: ShopId, is_open: bool) -> Result<(), RepositoryError> {
        self.shops.update_status(id, is_open).await
    }

    /// Shops within `radius_meters` of the query point, ordered by ascending
    /// geodesic distance (shop id breaks ties), capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the candidate query fails.
    pub async fn find_nearby(
        &self,
        params: NearbyParams,
    ) -> Result<Vec<NearbyShop>, RepositoryError> {
        let center = Coordinates::new(params.latitude, params.longitude);

        let candidates = self
            .shops
            .candidates_in_box(&center.bounding_box(params.radius_meters))
            .await?;

        Ok(rank_candidates(
            &center,
            candidates,
            params.radius_meters,
            params.limit,
        ))
    }
}

/// Exact-distance filter, ordering, and cap over bounding-box candidates.
fn rank_candidates(
    center: &Coordinates,
    candidates: Vec<ShopCandidate>,
    radius_meters: f64,
    limit: usize,
) -> Vec<NearbyShop> {
    let mut nearby: Vec<NearbyShop> = candidates
        .into_iter()
        .filter_map(|c| {
            let location = Coordinates::new(c.latitude, c.longitude);
            let distance = center.distance_meters(&location);
            (distance <= radius_meters).then(|| NearbyShop {
                id: ShopId::new(c.id),
                name: c.name,
                address: c.address,
                latitude: c.latitude,
                longitude: c.longitude,
                distance_meters: distance,
            })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_meters
            .total_cmp(&b.distance_meters)
            .then_with(|| a.id.cmp(&b.id))
    });
    nearby.truncate(limit);

    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i32, latitude: f64, longitude: f64) -> ShopCandidate {
        ShopCandidate {
            id,
            name: format!("shop-{id}"),
            address: String::new(),
            latitude,
            longitude,
        }
    }

    // Query point from the Chennai city center.
    const CENTER: Coordinates = Coordinates::new(13.0827, 80.2707);

    #[test]
    fn test_filters_beyond_radius() {
        // ~1.1 km and ~11 km due north of the center.
        let candidates = vec![
            candidate(1, 13.0927, 80.2707),
            candidate(2, 13.1827, 80.2707),
        ];

        let result = rank_candidates(&CENTER, candidates, 5000.0, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, ShopId::new(1));
        assert!(result[0].distance_meters <= 5000.0);
    }

    #[test]
    fn test_orders_ascending_by_distance() {
        let candidates = vec![
            candidate(1, 13.1127, 80.2707), // ~3.3 km
            candidate(2, 13.0927, 80.2707), // ~1.1 km
            candidate(3, 13.1027, 80.2707), // ~2.2 km
        ];

        let result = rank_candidates(&CENTER, candidates, 5000.0, 10);
        let ids: Vec<i32> = result.iter().map(|s| s.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        for pair in result.windows(2) {
            assert!(pair[0].distance_meters <= pair[1].distance_meters);
        }
    }

    #[test]
    fn test_caps_at_limit() {
        let candidates = (1..=20)
            .map(|i| candidate(i, 13.0827 + f64::from(i) * 0.001, 80.2707))
            .collect();

        let result = rank_candidates(&CENTER, candidates, 50_000.0, 10);
        assert_eq!(result.len(), 10);
    }

    #[test]
    fn test_equidistant_shops_break_ties_by_id() {
        // Same point, so identical distances; ordering must be by id.
        let candidates = vec![
            candidate(9, 13.0927, 80.2707),
            candidate(3, 13.0927, 80.2707),
            candidate(5, 13.0927, 80.2707),
        ];

        let result = rank_candidates(&CENTER, candidates, 5000.0, 10);
        let ids: Vec<i32> = result.iter().map(|s| s.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let candidates = vec![candidate(1, 13.0927, 80.2707)];
        assert!(rank_candidates(&CENTER, candidates, 5000.0, 0).is_empty());
    }
}
