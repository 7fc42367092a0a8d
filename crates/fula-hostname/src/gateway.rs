//! Known gateway registry
//!
//! Maps the hostnames this node answers for to the paths it serves on them
//! and whether it uses subdomain or path addressing. A registry is built
//! once per configuration generation and never mutated afterwards.

use crate::host::strip_port;
use crate::redirect::has_prefix;
use crate::subdomain::{subdomain_candidates, ParsedSubdomain};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default path prefixes served by a gateway
pub const DEFAULT_PATHS: &[&str] = &["/ipfs/", "/ipns/", "/api/", "/p2p/", "/version"];

/// How a single gateway hostname is served
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySpec {
    /// Path prefixes served on this hostname
    pub paths: Vec<String>,
    /// Redirect path requests to `{root}.{namespace}.{hostname}`
    pub use_subdomains: bool,
    /// Disable DNSLink lookups for this hostname
    pub no_dnslink: bool,
}

impl GatewaySpec {
    /// Create a gateway serving `paths`
    pub fn new<I, S>(paths: I, use_subdomains: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            use_subdomains,
            no_dnslink: false,
        }
    }

    /// Path-based gateway serving the default paths
    pub fn path_gateway() -> Self {
        Self::new(DEFAULT_PATHS.iter().copied(), false)
    }

    /// Subdomain gateway serving the default paths
    pub fn subdomain_gateway() -> Self {
        Self::new(DEFAULT_PATHS.iter().copied(), true)
    }

    /// Disable DNSLink for this hostname
    pub fn without_dnslink(mut self) -> Self {
        self.no_dnslink = true;
        self
    }

    /// Check whether this gateway serves `path`
    pub fn handles(&self, path: &str) -> bool {
        has_prefix(path, &self.paths)
    }
}

/// A user-supplied change to one registry entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayOverride {
    /// Keep whatever the built-in list says
    Inherit,
    /// Replace (or add) the entry
    Override(GatewaySpec),
    /// Remove the entry, even if it is built in
    Remove,
}

/// The built-in gateway list
pub fn builtin_gateways() -> Vec<(String, GatewaySpec)> {
    vec![
        ("localhost".to_string(), GatewaySpec::subdomain_gateway()),
        ("ipfs.io".to_string(), GatewaySpec::path_gateway()),
        ("gateway.ipfs.io".to_string(), GatewaySpec::path_gateway()),
        ("dweb.link".to_string(), GatewaySpec::subdomain_gateway()),
    ]
}

fn no_overrides() -> Vec<(String, GatewayOverride)> {
    Vec::new()
}

/// Lookup table of known gateway hostnames
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GatewayRegistry {
    gateways: HashMap<String, GatewaySpec>,
}

impl GatewayRegistry {
    /// Overlay `overrides` onto `builtins`
    pub fn build<B, O>(builtins: B, overrides: O) -> Self
    where
        B: IntoIterator<Item = (String, GatewaySpec)>,
        O: IntoIterator<Item = (String, GatewayOverride)>,
    {
        let mut gateways: HashMap<String, GatewaySpec> = builtins.into_iter().collect();

        for (hostname, entry) in overrides {
            match entry {
                GatewayOverride::Inherit => {}
                GatewayOverride::Override(spec) => {
                    gateways.insert(hostname, spec);
                }
                GatewayOverride::Remove => {
                    gateways.remove(&hostname);
                }
            }
        }

        Self { gateways }
    }

    /// Built-in gateways with `overrides` applied
    pub fn with_overrides<O>(overrides: O) -> Self
    where
        O: IntoIterator<Item = (String, GatewayOverride)>,
    {
        Self::build(builtin_gateways(), overrides)
    }

    /// Only the built-in gateways
    pub fn builtins() -> Self {
        Self::build(builtin_gateways(), no_overrides())
    }

    /// Find the gateway for a Host header value, falling back to the hostname
    /// without its port. Keys are matched exactly as configured.
    pub fn lookup(&self, host: &str) -> Option<&GatewaySpec> {
        self.gateways
            .get(host)
            .or_else(|| self.gateways.get(strip_port(host)))
    }

    /// Find the subdomain gateway a Host header belongs to.
    ///
    /// Tries each `{root}.{namespace}.{gateway}` split from the left and
    /// returns the first whose gateway part is registered.
    pub fn known_subdomain(&self, host: &str) -> Option<(&GatewaySpec, ParsedSubdomain)> {
        subdomain_candidates(host)
            .find_map(|parsed| self.lookup(&parsed.hostname).map(|spec| (spec, parsed)))
    }

    /// Check whether a hostname is registered
    pub fn contains(&self, host: &str) -> bool {
        self.lookup(host).is_some()
    }

    /// Number of registered hostnames
    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    /// Registered hostnames, sorted
    pub fn hostnames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gateways.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// One configuration generation of hostname routing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostnameSettings {
    /// Known gateways
    pub registry: GatewayRegistry,
    /// Try DNSLink for hostnames that are not known gateways
    pub wildcard_dnslink: bool,
}

impl HostnameSettings {
    /// Create settings from a registry
    pub fn new(registry: GatewayRegistry, wildcard_dnslink: bool) -> Self {
        Self {
            registry,
            wildcard_dnslink,
        }
    }
}

impl Default for HostnameSettings {
    fn default() -> Self {
        Self::new(GatewayRegistry::builtins(), true)
    }
}
