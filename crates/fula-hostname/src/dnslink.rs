//! DNSLink detection
//!
//! A hostname "has DNSLink" when `/ipns/{hostname}` resolves through the
//! node's name resolver. The probe only checks that a link exists; following
//! it to content is left to the content handler.

use crate::host::{is_domain, strip_port};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Depth used when checking for a DNSLink record
pub const DNSLINK_PROBE_DEPTH: u32 = 1;

/// Depth limit applied when a resolver is asked for depth 0 (unlimited)
pub const DEFAULT_DEPTH_LIMIT: u32 = 32;

/// Errors returned by a [`NameResolver`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The name resolved to another name and the depth limit was reached
    #[error("could not resolve name (recursion limit exceeded)")]
    Recursion,

    /// No record exists for the name
    #[error("could not resolve name: {0}")]
    NotFound(String),

    /// The resolver could not be queried
    #[error("name resolver unavailable: {0}")]
    Unavailable(String),
}

/// Resolves `/ipns/{name}` paths
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `name`, following at most `depth` links (0 means unlimited)
    async fn resolve(&self, name: &str, depth: u32) -> Result<String, ResolveError>;
}

/// Checks whether hostnames have a DNSLink record
#[derive(Clone)]
pub struct DnsLinkProbe {
    resolver: Arc<dyn NameResolver>,
}

impl DnsLinkProbe {
    /// Create a probe backed by `resolver`
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }

    /// Check whether `host` (with an optional port) has a DNSLink record.
    ///
    /// Hosts that are not fully qualified domain names are rejected without
    /// querying the resolver. A record that points at another name counts:
    /// only its existence matters here.
    pub async fn has_link(&self, host: &str) -> bool {
        let fqdn = strip_port(host);
        if !is_domain(fqdn) {
            trace!(host, "Not a domain name, skipping DNSLink lookup");
            return false;
        }

        let name = format!("/ipns/{fqdn}");
        match self.resolver.resolve(&name, DNSLINK_PROBE_DEPTH).await {
            Ok(_) | Err(ResolveError::Recursion) => true,
            Err(e) => {
                debug!(name = %name, error = %e, "No DNSLink");
                false
            }
        }
    }
}

impl std::fmt::Debug for DnsLinkProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsLinkProbe").finish_non_exhaustive()
    }
}

/// An in-memory name resolver for development and testing
#[derive(Clone, Default)]
pub struct StaticNameResolver {
    records: Arc<DashMap<String, String>>,
}

impl StaticNameResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a DNSLink for `domain` pointing at `path`
    pub fn insert_dnslink(&self, domain: &str, path: impl Into<String>) {
        self.records.insert(format!("/ipns/{domain}"), path.into());
    }

    /// Builder form of [`insert_dnslink`](Self::insert_dnslink)
    pub fn with_dnslink(self, domain: &str, path: impl Into<String>) -> Self {
        self.insert_dnslink(domain, path);
        self
    }

    /// Remove the DNSLink for `domain`
    pub fn remove_dnslink(&self, domain: &str) {
        self.records.remove(&format!("/ipns/{domain}"));
    }

    /// Number of published records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records are published
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve(&self, name: &str, depth: u32) -> Result<String, ResolveError> {
        let limit = if depth == 0 { DEFAULT_DEPTH_LIMIT } else { depth };
        let mut current = name.to_string();

        for _ in 0..limit {
            let next = self
                .records
                .get(&current)
                .map(|entry| entry.value().clone())
                .ok_or_else(|| ResolveError::NotFound(current.clone()))?;

            if !next.starts_with("/ipns/") {
                return Ok(next);
            }
            current = next;
        }

        Err(ResolveError::Recursion)
    }
}
