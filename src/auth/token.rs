//! Cached bearer credential

use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;

/// Default margin before expiry at which a token counts as stale
pub const DEFAULT_LEEWAY: Duration = Duration::from_secs(60);

/// A credential issued by the gatekeeper together with its decoded expiry.
///
/// Tokens are immutable; a refresh builds a new one and replaces the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    encoded: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    /// NumericDate: seconds since the epoch, possibly fractional
    exp: f64,
}

impl Token {
    /// Create a token from its parts
    pub fn new(encoded: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            encoded: encoded.into(),
            expires_at,
        }
    }

    /// Decode a JWT and read its `exp` claim.
    ///
    /// The signature is not checked: the backend that issued the token is the
    /// one that verifies it. An `exp` already in the past is accepted.
    pub fn decode(encoded: impl Into<String>) -> Result<Self, jsonwebtoken::errors::Error> {
        let encoded = encoded.into();

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(&encoded, &DecodingKey::from_secret(&[]), &validation)?;
        let expires_at = numeric_date(data.claims.exp).ok_or(ErrorKind::InvalidToken)?;

        Ok(Self {
            encoded,
            expires_at,
        })
    }

    /// The credential as sent by the backend
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token expires within `leeway` from now
    pub fn is_stale(&self, leeway: Duration) -> bool {
        self.is_stale_at(Utc::now(), leeway)
    }

    /// Whether the token expires within `leeway` from `now`
    pub fn is_stale_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match (self.expires_at - now).to_std() {
            Ok(remaining) => remaining <= leeway,
            // Already past expiry
            Err(_) => true,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn numeric_date(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let secs = value.floor();
    let nanos = ((value - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}
