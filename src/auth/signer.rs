//! Signing capability used to answer login challenges

use crate::types::{Algorithm, Challenge, PublicKey, Signature};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Holder of the private key that proves the wallet's identity.
///
/// Key material stays with the implementation; the authenticator only reads
/// the public key and asks for signatures.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Public key announced in the init round
    fn public_key(&self) -> PublicKey;

    /// Algorithm announced in the init round
    fn algorithm(&self) -> Algorithm {
        Algorithm::V1
    }

    /// Sign `challenge` together with `timestamp`.
    ///
    /// `timestamp` is truncated to millisecond precision, matching what is
    /// sent on the wire.
    async fn sign(&self, challenge: &Challenge, timestamp: DateTime<Utc>)
        -> anyhow::Result<Signature>;
}

#[async_trait]
impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    async fn sign(
        &self,
        challenge: &Challenge,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Signature> {
        (**self).sign(challenge, timestamp).await
    }
}
