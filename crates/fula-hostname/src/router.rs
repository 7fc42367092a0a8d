//! Hostname routing decisions
//!
//! Classifies one request by its Host header and decides whether to
//! redirect it to a subdomain gateway, rewrite its path into the
//! `/{namespace}/{root}/…` form the content handler understands, answer 404,
//! or pass it through unchanged.
//!
//! The branches are evaluated in a fixed order and the first one that
//! classifies the host decides:
//!
//! 1. known gateway hostname (`dweb.link`, `localhost:8080`)
//! 2. subdomain of a known subdomain gateway (`{cid}.ipfs.dweb.link`)
//! 3. any other hostname with a DNSLink record, if wildcard DNSLink is on
//! 4. everything else is served as a plain path gateway request

use crate::dnslink::DnsLinkProbe;
use crate::gateway::HostnameSettings;
use crate::host::strip_port;
use crate::redirect::to_subdomain_url;
use crate::{cid_utils, Namespace};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// The parts of a request the router looks at
#[derive(Clone, Copy, Debug)]
pub struct RouteRequest<'a> {
    /// Host header value, with optional port
    pub host: &'a str,
    /// Request path
    pub path: &'a str,
    /// Raw query string, without `?`
    pub query: Option<&'a str>,
    /// `X-Forwarded-Proto` header value
    pub forwarded_proto: Option<&'a str>,
}

/// What to do with a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Answer `301 Moved Permanently` with this `Location`
    Redirect(String),
    /// Answer `404 Not Found`
    NotFound,
    /// Hand the request to the content handler, with the path replaced if set
    Forward { path: Option<String> },
}

impl RouteDecision {
    /// Forward the request unchanged
    pub fn forward() -> Self {
        RouteDecision::Forward { path: None }
    }

    /// Forward the request with a new path
    pub fn rewrite(path: impl Into<String>) -> Self {
        RouteDecision::Forward {
            path: Some(path.into()),
        }
    }
}

/// Routes requests by hostname.
///
/// Holds the current [`HostnameSettings`] behind an atomically swapped
/// pointer: every request works on one snapshot, and [`reload`](Self::reload)
/// publishes a new one without blocking readers.
pub struct HostnameRouter {
    settings: ArcSwap<HostnameSettings>,
    probe: DnsLinkProbe,
}

impl HostnameRouter {
    /// Create a router
    pub fn new(settings: HostnameSettings, probe: DnsLinkProbe) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
            probe,
        }
    }

    /// The current settings snapshot
    pub fn settings(&self) -> Arc<HostnameSettings> {
        self.settings.load_full()
    }

    /// Publish a new configuration generation
    pub fn reload(&self, settings: HostnameSettings) {
        info!(
            gateways = settings.registry.len(),
            wildcard_dnslink = settings.wildcard_dnslink,
            "Hostname settings reloaded"
        );
        self.settings.store(Arc::new(settings));
    }

    /// Decide how to handle a request
    pub async fn route(&self, request: &RouteRequest<'_>) -> RouteDecision {
        let settings = self.settings.load_full();
        let host = request.host;

        // Known gateway hostname, e.g. dweb.link/ipfs/{cid}
        if let Some(gateway) = settings.registry.lookup(host) {
            if gateway.handles(request.path) {
                if gateway.use_subdomains {
                    if let Some(url) = to_subdomain_url(
                        host,
                        request.path,
                        request.forwarded_proto,
                        request.query,
                    ) {
                        debug!(host, location = %url, "Redirecting to subdomain gateway");
                        return RouteDecision::Redirect(url);
                    }
                }
                return RouteDecision::forward();
            }

            if !gateway.no_dnslink && self.probe.has_link(host).await {
                return RouteDecision::rewrite(dnslink_path(host, request.path));
            }

            debug!(host, path = request.path, "Path not served by gateway");
            return RouteDecision::NotFound;
        }

        // Subdomain gateway, e.g. {cid}.ipfs.dweb.link
        if let Some((gateway, subdomain)) = settings.registry.known_subdomain(host) {
            let prefix = subdomain.path_prefix();

            if !(gateway.use_subdomains && gateway.handles(&prefix)) {
                debug!(host, prefix = %prefix, "Subdomain not served by gateway");
                return RouteDecision::NotFound;
            }

            let full_path = format!("{}{}", prefix, request.path);

            if subdomain.namespace == Namespace::Ipns && needs_key_codec(&subdomain.root_id) {
                if let Some(url) = to_subdomain_url(
                    &subdomain.hostname,
                    &full_path,
                    request.forwarded_proto,
                    request.query,
                ) {
                    debug!(host, location = %url, "Redirecting to libp2p-key CID");
                    return RouteDecision::Redirect(url);
                }
            }

            return RouteDecision::rewrite(full_path);
        }

        // Any other hostname with a DNSLink record
        if settings.wildcard_dnslink && self.probe.has_link(host).await {
            return RouteDecision::rewrite(dnslink_path(host, request.path));
        }

        trace!(host, "Unclassified host, serving as path gateway");
        RouteDecision::forward()
    }
}

impl std::fmt::Debug for HostnameRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostnameRouter")
            .field("settings", &self.settings.load_full())
            .field("probe", &self.probe)
            .finish()
    }
}

fn dnslink_path(host: &str, path: &str) -> String {
    format!("/ipns/{}{}", strip_port(host), path)
}

/// A CID under /ipns/ that is not tagged libp2p-key
fn needs_key_codec(root_id: &str) -> bool {
    cid_utils::decode(root_id).is_ok_and(|cid| !cid_utils::is_libp2p_key(&cid))
}
