//! Authenticator configuration and login wire messages

use super::token::DEFAULT_LEEWAY;
use crate::http::HttpClientConfig;
use crate::types::{Algorithm, PublicKey, Signature};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime settings of a [`GatekeeperAuthenticator`](super::GatekeeperAuthenticator)
#[derive(Debug, Clone)]
pub struct AuthenticatorConfig {
    /// Refresh this long before the token actually expires
    pub leeway: Duration,
    /// Settings of the HTTP client used for the login round trips
    pub http: HttpClientConfig,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            leeway: DEFAULT_LEEWAY,
            http: HttpClientConfig::default(),
        }
    }
}

impl AuthenticatorConfig {
    /// Create a new config builder
    pub fn builder() -> AuthenticatorConfigBuilder {
        AuthenticatorConfigBuilder::default()
    }
}

/// Builder for authenticator configuration
#[derive(Debug, Default)]
pub struct AuthenticatorConfigBuilder {
    config: AuthenticatorConfig,
}

impl AuthenticatorConfigBuilder {
    /// Set the expiry leeway
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.config.leeway = leeway;
        self
    }

    /// Set the login request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.http.user_agent = agent.into();
        self
    }

    /// Add a header sent with both login requests
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .http
            .default_headers
            .insert(key.into(), value.into());
        self
    }

    /// Build the config
    pub fn build(self) -> AuthenticatorConfig {
        self.config
    }
}

/// Body of `POST /login`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenInitRequest {
    pub algorithm: Algorithm,
    pub public_key: PublicKey,
}

/// Response of `POST /login`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenInitResponse {
    pub challenge: String,
}

/// Body of `POST /login/challenges/{challenge}`
#[derive(Debug, Serialize)]
pub(crate) struct TokenInitAnswer {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub signature: Signature,
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = AuthenticatorConfig::default();
        assert_eq!(config.leeway, Duration::from_secs(60));
        assert_eq!(config.http.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder() {
        let config = AuthenticatorConfig::builder()
            .leeway(Duration::from_secs(120))
            .timeout(Duration::from_secs(5))
            .user_agent("wallet/2.0")
            .header("X-Wallet", "mobile")
            .build();

        assert_eq!(config.leeway, Duration::from_secs(120));
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.user_agent, "wallet/2.0");
        assert_eq!(
            config.http.default_headers.get("X-Wallet"),
            Some(&"mobile".to_string())
        );
    }

    #[test]
    fn test_init_request_wire_format() {
        let request = TokenInitRequest {
            algorithm: Algorithm::V1,
            public_key: PublicKey::new([0x0A; 32]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"algorithm": "V1", "publicKey": "0A".repeat(32)})
        );
    }

    #[test]
    fn test_answer_wire_format() {
        let answer = TokenInitAnswer {
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
            signature: Signature::new([0xFF; 64]),
        };
        assert_eq!(
            serde_json::to_value(&answer).unwrap(),
            json!({"timestamp": 1_700_000_000_123_i64, "signature": "FF".repeat(64)})
        );
    }

    #[test]
    fn test_init_response_ignores_unknown_fields() {
        let response: TokenInitResponse =
            serde_json::from_value(json!({"challenge": "abcd", "ttl": 30})).unwrap();
        assert_eq!(response.challenge, "abcd");
    }
}
