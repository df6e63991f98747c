//! Authentication module
//!
//! The [`GatekeeperAuthenticator`] obtains a bearer token through a
//! challenge-response login and caches it until it nears expiry. Header
//! providers expose that token to outbound clients.

mod authenticator;
mod header;
mod signer;
mod token;
mod types;

pub use authenticator::{Authenticator, GatekeeperAuthenticator};
pub use header::{
    apply_headers, AuthenticatorExt, AuthorizationHeaders, EmptyHeaders, FnHeaders,
    HeaderProvider, AUTHORIZATION_HEADER,
};
pub use signer::Signer;
pub use token::{Token, DEFAULT_LEEWAY};
pub use types::{AuthenticatorConfig, AuthenticatorConfigBuilder};
