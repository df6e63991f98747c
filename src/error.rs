//! Error types for the gatekeeper client
//!
//! Every public API returns `Result<T, Error>`. Login failures fall into three
//! families (transport, protocol, signing) which callers can tell apart through
//! [`Error::kind`].

use thiserror::Error;

/// The main error type for the gatekeeper client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No configuration available for network {network}")]
    UnknownNetwork { network: String },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    // ============================================================================
    // Login Errors
    // ============================================================================
    #[error("Unexpected response from {endpoint}: {message}")]
    Protocol { endpoint: String, message: String },

    #[error("Signing failed: {source}")]
    Signing {
        #[source]
        source: anyhow::Error,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or non-success HTTP status
    Transport,
    /// The backend answered with something we could not interpret
    Protocol,
    /// The signer could not produce a signature
    Signing,
    /// Invalid or missing configuration
    Config,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a protocol error for the given endpoint
    pub fn protocol(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Wrap a transport-level reqwest failure, keeping timeouts distinct
    pub fn http(endpoint: impl Into<String>, source: reqwest::Error, timeout_ms: u64) -> Self {
        let endpoint = endpoint.into();
        if source.is_timeout() {
            Self::Timeout {
                endpoint,
                timeout_ms,
            }
        } else {
            Self::Http { endpoint, source }
        }
    }

    /// Wrap an error raised by a signer
    pub fn signing(source: impl Into<anyhow::Error>) -> Self {
        Self::Signing {
            source: source.into(),
        }
    }

    /// Create an unknown network error
    pub fn unknown_network(network: impl std::fmt::Display) -> Self {
        Self::UnknownNetwork {
            network: network.to_string(),
        }
    }

    /// Which family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http { .. } | Error::HttpStatus { .. } | Error::Timeout { .. } => {
                ErrorKind::Transport
            }
            Error::Protocol { .. } => ErrorKind::Protocol,
            Error::Signing { .. } => ErrorKind::Signing,
            Error::Config { .. }
            | Error::UnknownNetwork { .. }
            | Error::InvalidUrl { .. }
            | Error::YamlParse(_)
            | Error::Io(_) => ErrorKind::Config,
        }
    }

    /// The endpoint involved in the failure, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Error::Http { endpoint, .. }
            | Error::HttpStatus { endpoint, .. }
            | Error::Timeout { endpoint, .. }
            | Error::Protocol { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Check if retrying the whole operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { source, .. } => source.is_connect() || source.is_request(),
            Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the gatekeeper client
pub type Result<T> = std::result::Result<T, Error>;
