//! Outbound clients for the node and worker services
//!
//! A [`BackendClient`] asks its [`HeaderProvider`] for fresh headers right
//! before each request, so an authenticated client always sends a credential
//! that is valid at send time.

use crate::auth::{Authenticator, AuthorizationHeaders, EmptyHeaders, HeaderProvider};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::network::{parse_url, Network, NetworkConfiguration, NetworkRegistry};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// HTTP client for one backend service with per-request headers
#[derive(Clone)]
pub struct BackendClient {
    http: HttpClient,
    headers: Arc<dyn HeaderProvider>,
}

impl BackendClient {
    /// Create a client for `base_url` using `headers` before every request
    pub fn new(base_url: &str, headers: Arc<dyn HeaderProvider>) -> Result<Self> {
        Self::with_config(base_url, headers, HttpClientConfig::default())
    }

    /// Create a client with custom HTTP settings; `config.base_url` is replaced
    pub fn with_config(
        base_url: &str,
        headers: Arc<dyn HeaderProvider>,
        mut config: HttpClientConfig,
    ) -> Result<Self> {
        parse_url(base_url)?;
        config.base_url = Some(base_url.to_string());
        Ok(Self {
            http: HttpClient::with_config(config)?,
            headers,
        })
    }

    /// Authenticated client for the node API of `configuration`
    pub fn node<A: Authenticator + 'static>(
        configuration: &NetworkConfiguration,
        authenticator: A,
    ) -> Result<Self> {
        Self::new(
            &configuration.endpoints.node_url,
            Arc::new(AuthorizationHeaders::new(authenticator)),
        )
    }

    /// Authenticated client for the node API of `network`
    pub fn node_for_network<A: Authenticator + 'static>(
        network: Network,
        authenticator: A,
    ) -> Result<Self> {
        let configuration = NetworkRegistry::global().configuration(network)?;
        Self::node(&configuration, authenticator)
    }

    /// Authenticated client for the worker API of `configuration`
    pub fn worker<A: Authenticator + 'static>(
        configuration: &NetworkConfiguration,
        authenticator: A,
    ) -> Result<Self> {
        Self::new(
            &configuration.endpoints.worker_url,
            Arc::new(AuthorizationHeaders::new(authenticator)),
        )
    }

    /// Authenticated client for the worker API of `network`
    pub fn worker_for_network<A: Authenticator + 'static>(
        network: Network,
        authenticator: A,
    ) -> Result<Self> {
        let configuration = NetworkRegistry::global().configuration(network)?;
        Self::worker(&configuration, authenticator)
    }

    /// Worker client that sends no credential
    pub fn anonymous_worker(configuration: &NetworkConfiguration) -> Result<Self> {
        Self::new(&configuration.endpoints.worker_url, Arc::new(EmptyHeaders))
    }

    pub fn base_url(&self) -> &str {
        self.http.config().base_url.as_deref().unwrap_or_default()
    }

    /// GET `path` and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::GET, path, None).await
    }

    /// POST `body` to `path` and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// Send a request with headers fetched from the provider just beforehand
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let headers = self.headers.headers().await?;
        self.http.send_json(method, path, body, &headers).await
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}
