//! Geographic coordinates and geodesic distance.
//!
//! Latitude/longitude degrees are not uniformly scaled to physical distance,
//! so proximity search must not use planar Euclidean distance. Distances here
//! use the haversine great-circle model over a mean-radius sphere, which is
//! accurate to well under 0.5% for city-scale radii.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees, north positive.
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Geodesic (great-circle) distance to `other`, in meters.
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Axis-aligned degree bounds guaranteed to contain every point within
    /// `radius_meters` of this coordinate.
    ///
    /// Used as an index-friendly SQL prefilter; candidates still go through
    /// the exact [`distance_meters`](Self::distance_meters) check. Near the
    /// poles the longitude span degenerates, so it widens to the full range
    /// rather than dividing by a vanishing cosine.
    #[must_use]
    pub fn bounding_box(&self, radius_meters: f64) -> BoundingBox {
        let lat_delta = radius_meters / METERS_PER_DEGREE;

        let cos_lat = self.latitude.to_radians().cos();
        let lon_delta = if cos_lat > 1e-6 {
            (radius_meters / (METERS_PER_DEGREE * cos_lat)).min(180.0)
        } else {
            180.0
        };

        BoundingBox {
            min_latitude: (self.latitude - lat_delta).max(-90.0),
            max_latitude: (self.latitude + lat_delta).min(90.0),
            min_longitude: (self.longitude - lon_delta).max(-180.0),
            max_longitude: (self.longitude + lon_delta).min(180.0),
        }
    }
}

/// Degree bounds produced by [`Coordinates::bounding_box`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHENNAI: Coordinates = Coordinates::new(13.0827, 80.2707);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert!(CHENNAI.distance_meters(&CHENNAI).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let other = Coordinates::new(12.9716, 77.5946);
        let forward = CHENNAI.distance_meters(&other);
        let backward = other.distance_meters(&CHENNAI);
        assert!((forward - backward).abs() < 1e-6);
    }

    #[test]
    fn test_one_hundredth_degree_of_latitude() {
        // 0.01 degrees of latitude is ~1112 m everywhere on the sphere.
        let north = Coordinates::new(CHENNAI.latitude + 0.01, CHENNAI.longitude);
        let d = CHENNAI.distance_meters(&north);
        assert!((d - 1112.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        // At 60 degrees north a degree of longitude spans half the equatorial
        // distance.
        let equator = Coordinates::new(0.0, 0.0);
        let equator_east = Coordinates::new(0.0, 0.01);
        let north = Coordinates::new(60.0, 0.0);
        let north_east = Coordinates::new(60.0, 0.01);

        let at_equator = equator.distance_meters(&equator_east);
        let at_sixty = north.distance_meters(&north_east);
        assert!((at_sixty / at_equator - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let bbox = CHENNAI.bounding_box(5000.0);
        // Points just inside 5 km due north/south/east/west stay in the box.
        for (dlat, dlon) in [(0.0449, 0.0), (-0.0449, 0.0), (0.0, 0.0461), (0.0, -0.0461)] {
            let p = Coordinates::new(CHENNAI.latitude + dlat, CHENNAI.longitude + dlon);
            assert!(CHENNAI.distance_meters(&p) <= 5_100.0);
            assert!(p.latitude >= bbox.min_latitude && p.latitude <= bbox.max_latitude);
            assert!(p.longitude >= bbox.min_longitude && p.longitude <= bbox.max_longitude);
        }
    }

    #[test]
    fn test_bounding_box_degenerates_at_pole() {
        let pole = Coordinates::new(89.9999, 0.0);
        let bbox = pole.bounding_box(1000.0);
        assert!((bbox.max_latitude - 90.0).abs() < f64::EPSILON);
        assert!((bbox.min_longitude - -180.0).abs() < f64::EPSILON);
        assert!((bbox.max_longitude - 180.0).abs() < f64::EPSILON);
    }
}
