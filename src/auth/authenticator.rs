//! Authenticator implementation
//!
//! Runs the challenge-response login against the wallet gatekeeper and caches
//! the resulting token until it comes within the leeway of its expiry.

use super::signer::Signer;
use super::token::Token;
use super::types::{AuthenticatorConfig, TokenInitAnswer, TokenInitRequest, TokenInitResponse};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Transport};
use crate::network::{parse_url, Network, NetworkConfiguration, NetworkRegistry};
use crate::types::Challenge;
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Source of bearer credentials
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return a credential that is valid for at least the configured leeway
    async fn authorization(&self) -> Result<String>;
}

#[async_trait]
impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    async fn authorization(&self) -> Result<String> {
        (**self).authorization().await
    }
}

/// Authenticator bound to a wallet gatekeeper base URL
pub struct GatekeeperAuthenticator {
    login_url: String,
    challenges_url: String,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn Transport>,
    leeway: Duration,
    /// Held across the freshness check and the whole login, so at most one
    /// login runs per instance
    cached_token: Mutex<Option<Token>>,
}

impl GatekeeperAuthenticator {
    /// Create an authenticator for a custom gatekeeper URL
    pub fn custom(url: &str, signer: impl Signer + 'static) -> Result<Self> {
        Self::with_config(url, signer, AuthenticatorConfig::default())
    }

    /// Create an authenticator for `network`, resolved through the global registry
    pub fn for_network(network: Network, signer: impl Signer + 'static) -> Result<Self> {
        let configuration = NetworkRegistry::global().configuration(network)?;
        Self::for_configuration(&configuration, signer)
    }

    /// Create an authenticator for the wallet gatekeeper of `configuration`
    pub fn for_configuration(
        configuration: &NetworkConfiguration,
        signer: impl Signer + 'static,
    ) -> Result<Self> {
        Self::custom(&configuration.endpoints.wallet_gatekeeper_url, signer)
    }

    /// Create an authenticator with custom settings
    pub fn with_config(
        url: &str,
        signer: impl Signer + 'static,
        config: AuthenticatorConfig,
    ) -> Result<Self> {
        let transport = HttpClient::with_config(config.http)?;
        Self::with_transport(url, signer, transport, config.leeway)
    }

    /// Create an authenticator over an arbitrary transport
    pub fn with_transport(
        url: &str,
        signer: impl Signer + 'static,
        transport: impl Transport + 'static,
        leeway: Duration,
    ) -> Result<Self> {
        parse_url(url)?;
        let login_url = format!("{}/login", url.trim_end_matches('/'));
        let challenges_url = format!("{login_url}/challenges");

        Ok(Self {
            login_url,
            challenges_url,
            signer: Arc::new(signer),
            transport: Arc::new(transport),
            leeway,
            cached_token: Mutex::new(None),
        })
    }

    /// URL of the init round
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Current cached token, fresh or not
    pub async fn cached_token(&self) -> Option<Token> {
        self.cached_token.lock().await.clone()
    }

    /// Clear the cached token (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.lock().await;
        *cached = None;
    }

    /// Run the two-round login and return the new token without caching it
    async fn login(&self) -> Result<Token> {
        info!(url = %self.login_url, "Logging in to wallet gatekeeper");

        let init = TokenInitRequest {
            algorithm: self.signer.algorithm(),
            public_key: self.signer.public_key(),
        };
        let body = serde_json::to_value(&init)
            .map_err(|e| Error::protocol(&self.login_url, e.to_string()))?;
        let raw = self.transport.post(&self.login_url, body).await?;

        let response: TokenInitResponse = serde_json::from_str(&raw)
            .map_err(|e| Error::protocol(&self.login_url, format!("invalid init response: {e}")))?;
        if response.challenge.is_empty() {
            return Err(Error::protocol(&self.login_url, "empty challenge"));
        }
        let challenge = Challenge::from_hex(&response.challenge).map_err(|e| {
            Error::protocol(&self.login_url, format!("challenge is not valid hex: {e}"))
        })?;
        debug!(?challenge, "Received login challenge");

        let timestamp = Utc::now().trunc_subsecs(3);
        let signature = self
            .signer
            .sign(&challenge, timestamp)
            .await
            .map_err(Error::signing)?;

        let answer_url = format!("{}/{}", self.challenges_url, response.challenge);
        let answer = TokenInitAnswer {
            timestamp,
            signature,
        };
        let body = serde_json::to_value(&answer)
            .map_err(|e| Error::protocol(&answer_url, e.to_string()))?;
        let raw = self.transport.post(&answer_url, body).await?;

        let encoded = parse_credential(&raw)
            .ok_or_else(|| Error::protocol(&answer_url, "empty credential"))?;
        let token = Token::decode(encoded).map_err(|e| {
            Error::protocol(&answer_url, format!("credential is not a valid JWT: {e}"))
        })?;

        if token.is_stale(Duration::ZERO) {
            warn!(expires_at = %token.expires_at(), "Gatekeeper issued an already expired token");
        } else {
            info!(expires_at = %token.expires_at(), "Obtained wallet gatekeeper token");
        }

        Ok(token)
    }
}

#[async_trait]
impl Authenticator for GatekeeperAuthenticator {
    async fn authorization(&self) -> Result<String> {
        let mut cached = self.cached_token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_stale(self.leeway) {
                trace!("Using cached token");
                return Ok(token.encoded().to_string());
            }
            debug!(expires_at = %token.expires_at(), "Cached token is stale, refreshing");
        }

        let token = match self.login().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(e);
            }
        };
        let encoded = token.encoded().to_string();
        *cached = Some(token);

        Ok(encoded)
    }
}

impl std::fmt::Debug for GatekeeperAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatekeeperAuthenticator")
            .field("login_url", &self.login_url)
            .field("public_key", &self.signer.public_key())
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

/// Extract the credential from the answer body.
///
/// The gatekeeper replies with the bare token, but a JSON string literal is
/// accepted as well.
pub(crate) fn parse_credential(body: &str) -> Option<String> {
    let body = body.trim();
    let credential = if body.starts_with('"') {
        serde_json::from_str::<String>(body).ok()?
    } else {
        body.to_string()
    };

    if credential.is_empty() {
        None
    } else {
        Some(credential)
    }
}
