//! Subdomain gateway hostname parsing
//!
//! A subdomain gateway encodes the content root in the leftmost labels of
//! the hostname: `{root}.{namespace}.{gateway}`, e.g.
//! `bafkrei….ipfs.dweb.link` or `en.wikipedia-on-ipfs.org.ipns.localhost:8080`.
//!
//! Parsing is a plain tokenizer over the dot-separated labels. A hostname
//! can contain several namespace-looking labels (`dist.ipfs.io.ipns.localhost`,
//! or a gateway living under `dweb.ipfs.pvt.k12.ma.us`), so
//! [`subdomain_candidates`] yields every possible split and the registry
//! decides which one names a known gateway.

use crate::Namespace;

/// Components of a subdomain gateway hostname
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSubdomain {
    /// Gateway hostname, including the port if one was present
    pub hostname: String,
    /// Namespace label
    pub namespace: Namespace,
    /// Content root: a CID, peer ID, or DNSLink name (may contain dots)
    pub root_id: String,
}

impl ParsedSubdomain {
    /// The path prefix this subdomain stands for: `/{namespace}/{root_id}`
    pub fn path_prefix(&self) -> String {
        format!("/{}/{}", self.namespace, self.root_id)
    }
}

/// Every way `host` can be read as `{root}.{namespace}.{gateway}`, ordered
/// from the leftmost namespace label to the rightmost.
pub fn subdomain_candidates(host: &str) -> impl Iterator<Item = ParsedSubdomain> + '_ {
    let dots: Vec<usize> = host.match_indices('.').map(|(i, _)| i).collect();

    (1..dots.len()).filter_map(move |k| {
        let (left, right) = (dots[k - 1], dots[k]);
        let namespace = host[left + 1..right].parse::<Namespace>().ok()?;
        let root_id = &host[..left];
        let hostname = &host[right + 1..];

        if root_id.is_empty() || !is_gateway_hostname(hostname) {
            return None;
        }

        Some(ParsedSubdomain {
            hostname: hostname.to_string(),
            namespace,
            root_id: root_id.to_string(),
        })
    })
}

/// Parse a Host header without knowledge of configured gateways.
///
/// Anchors on the leftmost namespace label, so a gateway domain that itself
/// contains `.ipfs.` is kept intact. Use
/// [`GatewayRegistry::known_subdomain`](crate::GatewayRegistry::known_subdomain)
/// when the set of gateways is known.
pub fn parse_subdomains(host: &str) -> Option<ParsedSubdomain> {
    subdomain_candidates(host).next()
}

fn is_gateway_hostname(hostname: &str) -> bool {
    !hostname.is_empty() && !hostname.contains(|c| matches!(c, '/' | '?' | '#' | '&'))
}
