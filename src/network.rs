//! Network identifiers and the backend endpoints they resolve to
//!
//! Each [`Network`] has a default set of service URLs derived from its name.
//! Deployments pointing at a private backend can override them at runtime,
//! either programmatically or from a YAML file:
//!
//! ```yaml
//! overrides:
//!   - network: cash
//!     endpoints:
//!       gatekeeper_url: https://gatekeeper.custom.cash.atto.dev
//!       wallet_gatekeeper_url: https://wallet-gatekeeper.custom.cash.atto.dev
//!       node_url: https://node.custom.cash.atto.dev
//! ```

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use tracing::info;

// ============================================================================
// Network
// ============================================================================

/// Atto network identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Live,
    Cash,
    Beta,
    Dev,
    Local,
    Unknown,
}

impl Network {
    /// All networks with a default configuration
    pub const KNOWN: [Network; 5] = [
        Network::Live,
        Network::Cash,
        Network::Beta,
        Network::Dev,
        Network::Local,
    ];

    /// Wire code of the network
    pub fn code(self) -> u8 {
        match self {
            Network::Live => 0,
            Network::Beta => 1,
            Network::Dev => 2,
            Network::Local => 3,
            Network::Cash => 4,
            Network::Unknown => 9,
        }
    }

    /// Resolve a wire code, falling back to [`Network::Unknown`]
    pub fn from_code(code: u8) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|n| n.code() == code)
            .unwrap_or(Network::Unknown)
    }

    /// Lower-case name, also used as the backend subdomain
    pub fn name(self) -> &'static str {
        match self {
            Network::Live => "live",
            Network::Cash => "cash",
            Network::Beta => "beta",
            Network::Dev => "dev",
            Network::Local => "local",
            Network::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Backend service URLs for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EndpointsDef")]
pub struct NetworkEndpoints {
    /// Public gatekeeper
    pub gatekeeper_url: String,
    /// Wallet gatekeeper, serving the login endpoints
    pub wallet_gatekeeper_url: String,
    /// Node API
    pub node_url: String,
    /// Proof-of-work worker API
    pub worker_url: String,
}

/// Serialized form where node and worker URLs are optional
#[derive(Deserialize)]
struct EndpointsDef {
    gatekeeper_url: String,
    wallet_gatekeeper_url: String,
    #[serde(default)]
    node_url: Option<String>,
    #[serde(default)]
    worker_url: Option<String>,
}

impl From<EndpointsDef> for NetworkEndpoints {
    fn from(def: EndpointsDef) -> Self {
        let mut endpoints = NetworkEndpoints::new(def.gatekeeper_url, def.wallet_gatekeeper_url);
        if let Some(url) = def.node_url {
            endpoints.node_url = url;
        }
        if let Some(url) = def.worker_url {
            endpoints.worker_url = url;
        }
        endpoints
    }
}

impl NetworkEndpoints {
    /// Create endpoints where node and worker share the gatekeeper URL
    pub fn new(gatekeeper_url: impl Into<String>, wallet_gatekeeper_url: impl Into<String>) -> Self {
        let gatekeeper_url = gatekeeper_url.into();
        Self {
            node_url: gatekeeper_url.clone(),
            worker_url: gatekeeper_url.clone(),
            gatekeeper_url,
            wallet_gatekeeper_url: wallet_gatekeeper_url.into(),
        }
    }

    #[must_use]
    pub fn with_node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = url.into();
        self
    }

    #[must_use]
    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        self.worker_url = url.into();
        self
    }

    fn validate(&self) -> Result<()> {
        for url in [
            &self.gatekeeper_url,
            &self.wallet_gatekeeper_url,
            &self.node_url,
            &self.worker_url,
        ] {
            parse_url(url)?;
        }
        Ok(())
    }
}

/// Parse and validate an absolute URL
pub(crate) fn parse_url(url: &str) -> Result<url::Url> {
    url::Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration of a single network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfiguration {
    pub network: Network,
    pub endpoints: NetworkEndpoints,
}

impl NetworkConfiguration {
    /// Default configuration for a known network
    pub fn default_for(network: Network) -> Option<Self> {
        if network == Network::Unknown {
            return None;
        }

        let subdomain = network.name();
        Some(Self {
            network,
            endpoints: NetworkEndpoints::new(
                backend_url("gatekeeper", subdomain),
                backend_url("wallet-gatekeeper", subdomain),
            ),
        })
    }
}

fn backend_url(service: &str, subdomain: &str) -> String {
    format!("https://{service}.{subdomain}.application.atto.cash")
}

/// YAML document holding endpoint overrides
#[derive(Debug, Default, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    overrides: Vec<NetworkConfiguration>,
}

// ============================================================================
// Registry
// ============================================================================

static GLOBAL: Lazy<NetworkRegistry> = Lazy::new(NetworkRegistry::new);

/// Resolves network configurations, honouring runtime overrides
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    overrides: RwLock<HashMap<Network, NetworkConfiguration>>,
}

impl NetworkRegistry {
    /// Create a registry with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the network-based constructors
    pub fn global() -> &'static NetworkRegistry {
        &GLOBAL
    }

    /// Configuration for `network`: the override if one is set, else the default
    pub fn configuration(&self, network: Network) -> Result<NetworkConfiguration> {
        let overrides = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        overrides
            .get(&network)
            .cloned()
            .or_else(|| NetworkConfiguration::default_for(network))
            .ok_or_else(|| Error::unknown_network(network))
    }

    /// Replace the configuration of `configuration.network`
    pub fn override_configuration(&self, configuration: NetworkConfiguration) -> Result<()> {
        configuration.endpoints.validate()?;
        info!(
            network = %configuration.network,
            wallet_gatekeeper = %configuration.endpoints.wallet_gatekeeper_url,
            "Overriding network endpoints"
        );
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(configuration.network, configuration);
        Ok(())
    }

    /// Replace only the endpoints of `network`
    pub fn override_endpoints(&self, network: Network, endpoints: NetworkEndpoints) -> Result<()> {
        self.override_configuration(NetworkConfiguration { network, endpoints })
    }

    /// Drop the override for `network`, restoring its default
    pub fn reset(&self, network: Network) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&network);
    }

    /// Apply overrides from a YAML document; returns how many were applied
    pub fn load_overrides_yaml(&self, yaml: &str) -> Result<usize> {
        let file: OverridesFile = serde_yaml::from_str(yaml)?;
        for configuration in &file.overrides {
            configuration.endpoints.validate()?;
        }

        let count = file.overrides.len();
        for configuration in file.overrides {
            self.override_configuration(configuration)?;
        }
        Ok(count)
    }

    /// Apply overrides from a YAML file
    pub fn load_overrides_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.load_overrides_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use test_case::test_case;

    #[test_case(Network::Live, 0)]
    #[test_case(Network::Beta, 1)]
    #[test_case(Network::Dev, 2)]
    #[test_case(Network::Local, 3)]
    #[test_case(Network::Cash, 4)]
    fn test_network_code(network: Network, code: u8) {
        assert_eq!(network.code(), code);
        assert_eq!(Network::from_code(code), network);
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(Network::from_code(200), Network::Unknown);
        assert_eq!(Network::from_code(9), Network::Unknown);
    }

    #[test]
    fn test_default_endpoints_for_cash() {
        let registry = NetworkRegistry::new();
        let configuration = registry.configuration(Network::Cash).unwrap();

        assert_eq!(
            configuration.endpoints.wallet_gatekeeper_url,
            "https://wallet-gatekeeper.cash.application.atto.cash"
        );
        assert_eq!(
            configuration.endpoints.gatekeeper_url,
            "https://gatekeeper.cash.application.atto.cash"
        );
        assert_eq!(
            configuration.endpoints.node_url,
            configuration.endpoints.gatekeeper_url
        );
        assert_eq!(
            configuration.endpoints.worker_url,
            configuration.endpoints.gatekeeper_url
        );
    }

    #[test]
    fn test_unknown_network_has_no_configuration() {
        let registry = NetworkRegistry::new();
        let err = registry.configuration(Network::Unknown).unwrap_err();
        assert!(matches!(err, Error::UnknownNetwork { .. }));
    }

    #[test]
    fn test_override_and_reset() {
        let registry = NetworkRegistry::new();
        let endpoints = NetworkEndpoints::new(
            "https://gatekeeper.custom.cash.atto.dev",
            "https://wallet-gatekeeper.custom.cash.atto.dev",
        )
        .with_node_url("https://node.custom.cash.atto.dev")
        .with_worker_url("https://worker.custom.cash.atto.dev");

        registry
            .override_endpoints(Network::Cash, endpoints.clone())
            .unwrap();
        let resolved = registry.configuration(Network::Cash).unwrap();
        assert_eq!(resolved.endpoints, endpoints);

        // Other networks are untouched
        let live = registry.configuration(Network::Live).unwrap();
        assert_eq!(
            live.endpoints.gatekeeper_url,
            "https://gatekeeper.live.application.atto.cash"
        );

        registry.reset(Network::Cash);
        let restored = registry.configuration(Network::Cash).unwrap();
        assert_eq!(
            restored.endpoints.node_url,
            "https://gatekeeper.cash.application.atto.cash"
        );
    }

    #[test]
    fn test_override_rejects_invalid_url() {
        let registry = NetworkRegistry::new();
        let err = registry
            .override_endpoints(
                Network::Dev,
                NetworkEndpoints::new("not a url", "https://wallet.example"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
        assert!(registry
            .configuration(Network::Dev)
            .unwrap()
            .endpoints
            .gatekeeper_url
            .contains("application.atto.cash"));
    }

    #[test]
    fn test_load_overrides_yaml() {
        let registry = NetworkRegistry::new();
        let yaml = r"
overrides:
  - network: local
    endpoints:
      gatekeeper_url: http://localhost:8080
      wallet_gatekeeper_url: http://localhost:8081
      worker_url: http://localhost:8085
";
        assert_eq!(registry.load_overrides_yaml(yaml).unwrap(), 1);

        let local = registry.configuration(Network::Local).unwrap();
        assert_eq!(local.endpoints.wallet_gatekeeper_url, "http://localhost:8081");
        assert_eq!(local.endpoints.node_url, "http://localhost:8080");
        assert_eq!(local.endpoints.worker_url, "http://localhost:8085");
    }

    #[test]
    fn test_load_overrides_is_all_or_nothing() {
        let registry = NetworkRegistry::new();
        let yaml = r"
overrides:
  - network: beta
    endpoints:
      gatekeeper_url: http://beta.internal
      wallet_gatekeeper_url: http://wallet.beta.internal
  - network: dev
    endpoints:
      gatekeeper_url: ':bad'
      wallet_gatekeeper_url: http://wallet.dev.internal
";
        assert!(registry.load_overrides_yaml(yaml).is_err());
        assert_eq!(
            registry
                .configuration(Network::Beta)
                .unwrap()
                .endpoints
                .gatekeeper_url,
            "https://gatekeeper.beta.application.atto.cash"
        );
    }

    #[test]
    fn test_load_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "overrides:\n  - network: dev\n    endpoints:\n      gatekeeper_url: http://dev.internal\n      wallet_gatekeeper_url: http://wallet.dev.internal"
        )
        .unwrap();

        let registry = NetworkRegistry::new();
        assert_eq!(registry.load_overrides_file(file.path()).unwrap(), 1);
        assert_eq!(
            registry
                .configuration(Network::Dev)
                .unwrap()
                .endpoints
                .wallet_gatekeeper_url,
            "http://wallet.dev.internal"
        );
    }

    #[test]
    fn test_load_overrides_missing_file() {
        let registry = NetworkRegistry::new();
        let err = registry
            .load_overrides_file("/nonexistent/overrides.yaml")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
