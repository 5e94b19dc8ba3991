//! Principal roles embedded in access tokens.

use serde::{Deserialize, Serialize};

/// The kind of principal a verified token represents.
///
/// Every access token carries exactly one role claim; the auth guards compare
/// it against the role they require. `Admin` is a role value carried by a user
/// row - there is no separate admin identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A registered end user discovering and subscribing to shops.
    User,
    /// A shop owner managing a shop and its product listings.
    ShopOwner,
    /// A platform administrator (user row with elevated role).
    Admin,
}

impl Role {
    /// The wire form of the role, as embedded in token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::ShopOwner => "shop_owner",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "shop_owner" => Ok(Self::ShopOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::ShopOwner.to_string(), "shop_owner");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_from_str_roundtrip() {
        for role in [Role::User, Role::ShopOwner, Role::Admin] {
            let parsed: Role = role.as_str().parse().expect("role parses");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("User".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_wire_form() {
        let json = serde_json::to_string(&Role::ShopOwner).expect("serialize");
        assert_eq!(json, "\"shop_owner\"");
        let back: Role = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Role::ShopOwner);
    }
}
