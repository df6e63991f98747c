//! # Atto Gatekeeper Client
//!
//! Bearer authentication against the Atto wallet gatekeeper.
//!
//! ## Features
//!
//! - **Challenge-response login**: proves key possession by signing a one-time
//!   challenge issued by the gatekeeper
//! - **Token caching**: the issued JWT is reused until it comes within a leeway
//!   of its expiry
//! - **Single-flight refresh**: concurrent callers share one login
//! - **Header providers**: plug the credential into node and worker clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use atto_gatekeeper::{Authenticator, BackendClient, GatekeeperAuthenticator, Network};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> atto_gatekeeper::Result<()> {
//!     // `MySigner` implements `atto_gatekeeper::Signer`
//!     let auth = Arc::new(GatekeeperAuthenticator::for_network(Network::Live, MySigner::load()?)?);
//!
//!     // Use the credential directly
//!     let jwt = auth.authorization().await?;
//!
//!     // Or let an outbound client attach it to every request
//!     let node = BackendClient::node_for_network(Network::Live, auth.clone())?;
//!     let account: serde_json::Value = node.get_json("/accounts/...").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Login protocol
//!
//! ```text
//!  client                                   wallet gatekeeper
//!    │  POST /login {algorithm, publicKey}        │
//!    │ ─────────────────────────────────────────► │
//!    │               {challenge}                  │
//!    │ ◄───────────────────────────────────────── │
//!    │  sign(challenge, timestamp)                │
//!    │  POST /login/challenges/{challenge}        │
//!    │       {timestamp, signature}               │
//!    │ ─────────────────────────────────────────► │
//!    │               <jwt>                        │
//!    │ ◄───────────────────────────────────────── │
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Keys, signatures and challenges
pub mod types;

/// Challenge-response authentication and token caching
pub mod auth;

/// HTTP transport
pub mod http;

/// Network identifiers and backend endpoints
pub mod network;

/// Outbound node and worker clients
pub mod backend;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{
    Authenticator, AuthenticatorConfig, AuthenticatorExt, AuthorizationHeaders,
    GatekeeperAuthenticator, HeaderProvider, Signer, Token,
};
pub use backend::BackendClient;
pub use error::{Error, ErrorKind, Result};
pub use network::{Network, NetworkConfiguration, NetworkEndpoints, NetworkRegistry};
pub use types::{Algorithm, Challenge, PublicKey, Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
