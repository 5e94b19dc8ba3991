//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopnear_core::{Email, UserId};

/// A registered end user.
///
/// The password hash is never part of the domain type; repositories return it
/// separately to the credential-checking path only.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: Email,
    /// Last known latitude in decimal degrees.
    pub latitude: f64,
    /// Last known longitude in decimal degrees.
    pub longitude: f64,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
