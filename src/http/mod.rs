//! HTTP client module
//!
//! Provides the [`Transport`] seam used by the login protocol and the
//! reqwest-backed [`HttpClient`] that implements it.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Transport};
