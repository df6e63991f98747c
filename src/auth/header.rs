//! Per-request header suppliers for outbound clients

use super::authenticator::Authenticator;
use crate::error::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::RequestBuilder;
use std::collections::HashMap;

/// Name of the header carrying the bearer credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Produces the headers to attach to the next outbound request.
///
/// Called immediately before every request; implementations must not assume
/// the result is reused.
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    async fn headers(&self) -> Result<HashMap<String, String>>;
}

/// Turns an [`Authenticator`] into `Authorization: Bearer <credential>` headers
#[derive(Debug, Clone)]
pub struct AuthorizationHeaders<A> {
    authenticator: A,
}

impl<A: Authenticator> AuthorizationHeaders<A> {
    pub fn new(authenticator: A) -> Self {
        Self { authenticator }
    }

    pub fn authenticator(&self) -> &A {
        &self.authenticator
    }
}

#[async_trait]
impl<A: Authenticator> HeaderProvider for AuthorizationHeaders<A> {
    async fn headers(&self) -> Result<HashMap<String, String>> {
        let credential = self.authenticator.authorization().await?;
        let mut headers = HashMap::with_capacity(1);
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("Bearer {credential}"),
        );
        Ok(headers)
    }
}

/// Provider that adds nothing, for services that need no credential
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyHeaders;

#[async_trait]
impl HeaderProvider for EmptyHeaders {
    async fn headers(&self) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }
}

/// Adapts an async closure into a [`HeaderProvider`]
pub struct FnHeaders<F>(F);

impl<F> FnHeaders<F>
where
    F: Fn() -> BoxFuture<'static, Result<HashMap<String, String>>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> HeaderProvider for FnHeaders<F>
where
    F: Fn() -> BoxFuture<'static, Result<HashMap<String, String>>> + Send + Sync,
{
    async fn headers(&self) -> Result<HashMap<String, String>> {
        (self.0)().await
    }
}

/// Conversion of any authenticator into a header provider
pub trait AuthenticatorExt: Authenticator + Sized {
    fn into_header_provider(self) -> AuthorizationHeaders<Self> {
        AuthorizationHeaders::new(self)
    }
}

impl<A: Authenticator> AuthenticatorExt for A {}

/// Fetch headers from `provider` and attach them to `req`
pub async fn apply_headers(
    provider: &dyn HeaderProvider,
    req: RequestBuilder,
) -> Result<RequestBuilder> {
    let mut req = req;
    for (key, value) in provider.headers().await? {
        req = req.header(key, value);
    }
    Ok(req)
}
