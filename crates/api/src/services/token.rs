//! Signed access-token codec.
//!
//! Tokens are HS256 JWTs carrying a subject id, a role, and an expiry seven
//! days out. The codec is constructed once from the configured signing secret
//! and lives in the application state; verification is pure CPU and never
//! touches storage. Tokens are never revoked server-side - logout is
//! client-side cookie clearing.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use shopnear_core::Role;

/// Token lifetime: 7 days.
const TOKEN_LIFETIME_HOURS: i64 = 168;

/// Errors produced by token issuance and verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, algorithm, structure, or claim shape is wrong.
    #[error("invalid token")]
    Invalid,

    /// The token is structurally valid but past its expiry.
    #[error("token expired")]
    Expired,

    /// Signing failed (should not happen with a valid key).
    #[error("token signing failed")]
    Signing,
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: i64,
    role: &'a str,
    exp: i64,
}

/// Encodes and decodes signed principal-identity tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the process-wide signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        // Only HS256 is accepted; tokens signed with any other algorithm are
        // rejected outright. Library expiry validation is disabled because
        // the explicit check below must tolerate numeric and string-encoded
        // exp claims alike.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `subject` acting as `role`, expiring in 7 days.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the JWT library rejects the key.
    pub fn issue(&self, subject: i64, role: Role) -> Result<String, TokenError> {
        let exp = Utc::now().timestamp() + TOKEN_LIFETIME_HOURS * 3600;
        let claims = Claims {
            sub: subject,
            role: role.as_str(),
            exp,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return its `(subject, role)` pair.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, a non-HS256
    /// algorithm, or malformed claims, and `TokenError::Expired` when the
    /// embedded expiry is in the past.
    pub fn verify(&self, token: &str) -> Result<(i64, Role), TokenError> {
        let data = jsonwebtoken::decode::<serde_json::Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;
        let claims = data.claims;

        // Expiry first: an expired token must report as expired even when the
        // claim arrived as a string.
        let exp = integer_claim(claims.get("exp").ok_or(TokenError::Invalid)?)?;
        if Utc::now().timestamp() > exp {
            return Err(TokenError::Expired);
        }

        let subject = integer_claim(claims.get("sub").ok_or(TokenError::Invalid)?)?;

        let role = claims
            .get("role")
            .and_then(Value::as_str)
            .ok_or(TokenError::Invalid)?
            .parse::<Role>()
            .map_err(|_| TokenError::Invalid)?;

        Ok((subject, role))
    }
}

/// Decode an integer claim from a native number, a float (some issuers emit
/// fractional unix times), or a numeric string.
fn integer_claim(value: &Value) -> Result<i64, TokenError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f.abs() < 9.2e18 {
                    #[allow(clippy::cast_possible_truncation)] // bounds-checked above
                    Ok(f.trunc() as i64)
                } else {
                    Err(TokenError::Invalid)
                }
            } else {
                Err(TokenError::Invalid)
            }
        }
        Value::String(s) => s.trim().parse().map_err(|_| TokenError::Invalid),
        _ => Err(TokenError::Invalid),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("k9#mP2$vQ7&wX4!zR8@nT5^bY1*cF6(d"))
    }

    fn encode_raw(claims: &Value, algorithm: Algorithm, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    const SECRET: &str = "k9#mP2$vQ7&wX4!zR8@nT5^bY1*cF6(d";

    #[test]
    fn test_roundtrip_all_roles() {
        let codec = codec();
        for role in [Role::User, Role::ShopOwner, Role::Admin] {
            let token = codec.issue(42, role).unwrap();
            assert_eq!(codec.verify(&token).unwrap(), (42, role));
        }
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(codec().verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_eq!(codec().verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = codec().issue(1, Role::User).unwrap();
        let other = TokenCodec::new(&SecretString::from("q3!jD8$fH1&sL6@gV9#xB4^mZ7*aW2(e"));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_algorithm_is_invalid() {
        // Same secret, different MAC - must be rejected, not downgraded.
        let claims = json!({"sub": 1, "role": "user", "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS384, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_past_exp_is_expired() {
        let claims = json!({"sub": 1, "role": "user", "exp": Utc::now().timestamp() - 60});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_string_exp_is_tolerated() {
        let future = (Utc::now().timestamp() + 3600).to_string();
        let claims = json!({"sub": 7, "role": "admin", "exp": future});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token).unwrap(), (7, Role::Admin));
    }

    #[test]
    fn test_past_string_exp_is_expired() {
        let past = (Utc::now().timestamp() - 60).to_string();
        let claims = json!({"sub": 7, "role": "admin", "exp": past});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_string_sub_is_tolerated() {
        let claims = json!({"sub": "31", "role": "shop_owner", "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token).unwrap(), (31, Role::ShopOwner));
    }

    #[test]
    fn test_float_exp_is_tolerated() {
        #[allow(clippy::cast_precision_loss)]
        let exp = (Utc::now().timestamp() + 3600) as f64 + 0.5;
        let claims = json!({"sub": 2, "role": "user", "exp": exp});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token).unwrap(), (2, Role::User));
    }

    #[test]
    fn test_non_numeric_sub_is_invalid() {
        let claims = json!({"sub": "forty-two", "role": "user", "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Invalid));

        let claims = json!({"sub": [1], "role": "user", "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_missing_claims_are_invalid() {
        let codec = codec();
        for claims in [
            json!({"role": "user", "exp": Utc::now().timestamp() + 3600}),
            json!({"sub": 1, "exp": Utc::now().timestamp() + 3600}),
            json!({"sub": 1, "role": "user"}),
        ] {
            let token = encode_raw(&claims, Algorithm::HS256, SECRET);
            assert_eq!(codec.verify(&token), Err(TokenError::Invalid));
        }
    }

    #[test]
    fn test_non_string_role_is_invalid() {
        let claims = json!({"sub": 1, "role": 3, "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_unknown_role_is_invalid() {
        let claims = json!({"sub": 1, "role": "root", "exp": Utc::now().timestamp() + 3600});
        let token = encode_raw(&claims, Algorithm::HS256, SECRET);
        assert_eq!(codec().verify(&token), Err(TokenError::Invalid));
    }
}
