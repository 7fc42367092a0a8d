//! Gateway configuration

use config::{Config, ConfigError, Environment, File, FileFormat};
use fula_hostname::{
    GatewayOverride, GatewayRegistry, GatewaySpec, HostnameSettings, DEFAULT_PATHS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Prefix of environment variables overriding file settings,
/// e.g. `FULA_GATEWAY__PORT=8080` or `FULA_GATEWAY__NO_DNSLINK=true`
pub const ENV_PREFIX: &str = "FULA_GATEWAY";

/// Gateway server configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// IPFS RPC API URL, used for name resolution
    pub ipfs_api_url: String,
    /// Gateway that serves content for routed requests
    pub upstream_url: String,
    /// Timeout for name resolution requests (seconds)
    pub resolve_timeout_secs: u64,
    /// Disable DNSLink lookups for hostnames that are not known gateways
    pub no_dnslink: bool,
    /// Paths served by configured gateways that do not list their own
    pub default_paths: Vec<String>,
    /// Public gateway overrides keyed by hostname
    pub public_gateways: HashMap<String, PublicGatewayEntry>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ipfs_api_url: "http://localhost:5001".to_string(),
            upstream_url: "http://localhost:8081".to_string(),
            resolve_timeout_secs: 10,
            no_dnslink: false,
            default_paths: DEFAULT_PATHS.iter().map(|p| p.to_string()).collect(),
            public_gateways: HashMap::new(),
        }
    }
}

/// One entry of the `public_gateways` table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicGatewayEntry {
    /// Path prefixes served; the configured default paths when unset
    pub paths: Option<Vec<String>>,
    /// Serve content from `{root}.{namespace}.{hostname}` subdomains
    pub use_subdomains: bool,
    /// Disable DNSLink on this hostname. Independent of the global
    /// `no_dnslink`, which only covers hostnames that are not gateways
    pub no_dnslink: bool,
    /// Remove this hostname, including built-in gateways
    pub remove: bool,
}

impl PublicGatewayEntry {
    /// Registry override for this entry
    pub fn to_override(&self, default_paths: &[String]) -> GatewayOverride {
        if self.remove {
            return GatewayOverride::Remove;
        }

        let paths = self.paths.clone().unwrap_or_else(|| default_paths.to_vec());
        let mut spec = GatewaySpec::new(paths, self.use_subdomains);
        spec.no_dnslink = self.no_dnslink;
        GatewayOverride::Override(spec)
    }
}

impl GatewayConfig {
    /// Load configuration: defaults, then the optional TOML file, then
    /// `FULA_GATEWAY__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Name resolution timeout
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    /// Build the hostname routing settings for this configuration
    pub fn hostname_settings(&self) -> HostnameSettings {
        let overrides = self
            .public_gateways
            .iter()
            .map(|(hostname, entry)| (hostname.clone(), entry.to_override(&self.default_paths)));

        HostnameSettings::new(GatewayRegistry::with_overrides(overrides), !self.no_dnslink)
    }
}
