//! Application state

use crate::config::GatewayConfig;
use fula_hostname::{
    DnsLinkProbe, HostnameRouter, KuboConfig, KuboNameResolver, NameResolver,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration at startup
    pub config: GatewayConfig,
    /// Hostname router, shared with the routing middleware
    pub hostname: Arc<HostnameRouter>,
    /// Client for the upstream content gateway
    pub upstream: reqwest::Client,
}

impl AppState {
    /// Create application state resolving names through the IPFS RPC API
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let kubo_config =
            KuboConfig::with_url(&config.ipfs_api_url).with_timeout(config.resolve_timeout());
        let resolver = KuboNameResolver::new(kubo_config)?;

        match resolver.verify_connection().await {
            Ok(()) => info!("Connected to IPFS at {}", config.ipfs_api_url),
            Err(e) => warn!(
                "IPFS API unreachable ({}), DNSLink lookups will fail until it is up",
                e
            ),
        }

        Self::with_resolver(config, Arc::new(resolver))
    }

    /// Create application state with a custom name resolver
    pub fn with_resolver(
        config: GatewayConfig,
        resolver: Arc<dyn NameResolver>,
    ) -> anyhow::Result<Self> {
        let settings = config.hostname_settings();
        info!(
            gateways = settings.registry.len(),
            wildcard_dnslink = settings.wildcard_dnslink,
            "Hostname routing configured"
        );

        let hostname = Arc::new(HostnameRouter::new(settings, DnsLinkProbe::new(resolver)));

        // Redirects from the upstream are relayed, not followed
        let upstream = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            config,
            hostname,
            upstream,
        })
    }

    /// Upstream gateway URL without a trailing slash
    pub fn upstream_base(&self) -> &str {
        self.config.upstream_url.trim_end_matches('/')
    }
}
