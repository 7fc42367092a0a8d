//! Name resolution over the IPFS (Kubo) HTTP RPC API

use crate::dnslink::{NameResolver, ResolveError};
use crate::{HostnameError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// Configuration for the Kubo RPC connection
#[derive(Clone, Debug)]
pub struct KuboConfig {
    /// IPFS API URL (e.g., "http://localhost:5001")
    pub api_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for KuboConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5001".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl KuboConfig {
    /// Create with a custom API URL
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolves names with `POST /api/v0/name/resolve`
#[derive(Clone, Debug)]
pub struct KuboNameResolver {
    client: Client,
    config: KuboConfig,
}

impl KuboNameResolver {
    /// Create a resolver. No request is made until the first lookup.
    pub fn new(config: KuboConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HostnameError::ResolverUnavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Check that the node answers RPC calls
    pub async fn verify_connection(&self) -> Result<()> {
        let url = format!("{}/api/v0/id", self.api_base());
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| HostnameError::ResolverUnavailable(format!("Failed to connect to IPFS: {}", e)))?;

        if !response.status().is_success() {
            return Err(HostnameError::ResolverUnavailable(format!(
                "IPFS API returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// The configured API URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }
}

#[async_trait]
impl NameResolver for KuboNameResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str, depth: u32) -> std::result::Result<String, ResolveError> {
        let url = format!("{}/api/v0/name/resolve", self.api_base());
        // The RPC API only distinguishes a single hop from full recursion
        let recursive = if depth == 1 { "false" } else { "true" };

        let response = self
            .client
            .post(&url)
            .query(&[("arg", name), ("recursive", recursive)])
            .send()
            .await
            .map_err(|e| ResolveError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            let resolved: ResolveResponse = response
                .json()
                .await
                .map_err(|e| ResolveError::Unavailable(e.to_string()))?;
            return Ok(resolved.path);
        }

        let status = response.status();
        let message = match response.json::<RpcError>().await {
            Ok(error) => error.message,
            Err(_) => format!("IPFS API returned {}", status),
        };
        Err(classify_error(message))
    }
}

fn classify_error(message: String) -> ResolveError {
    if message.contains("recursion limit") {
        ResolveError::Recursion
    } else if message.contains("could not resolve name") || message.contains("not found") {
        ResolveError::NotFound(message)
    } else {
        ResolveError::Unavailable(message)
    }
}

/// Response from name/resolve
#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(rename = "Path")]
    path: String,
}

/// Error body returned by the RPC API
#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(rename = "Message")]
    message: String,
}
