//! Subdomain redirect construction and path prefix matching

use crate::host::strip_port;
use crate::{cid_utils, HostnameError, Namespace, Result};
use tracing::debug;
use url::Url;

/// Check whether `path` falls under one of `prefixes`.
///
/// Trailing slashes on prefixes are ignored, and a prefix only matches on a
/// segment boundary: `/ipfs` matches `/ipfs` and `/ipfs/cid`, never `/ipfsx`.
pub fn has_prefix<S: AsRef<str>>(path: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.as_ref().trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Build the subdomain gateway URL for a path-based request.
///
/// `/ipfs/{cid}/rest` on gateway `hostname` becomes
/// `{scheme}://{cid}.ipfs.{hostname}/rest?{query}`. CIDs are canonicalized
/// (CIDv1, base32, libp2p-key for peer IDs). The scheme is `https` only when
/// a reverse proxy reported `X-Forwarded-Proto: https`.
///
/// Returns `None` when the path has no namespace and root, names an unknown
/// namespace, or the result does not validate as a redirect target.
pub fn to_subdomain_url(
    hostname: &str,
    path: &str,
    forwarded_proto: Option<&str>,
    raw_query: Option<&str>,
) -> Option<String> {
    let mut parts = path.splitn(4, '/').skip(1);
    let namespace: Namespace = parts.next()?.parse().ok()?;
    let root_id = parts.next().filter(|root| !root.is_empty())?;
    let rest = parts.next().unwrap_or("");

    let root_id = match cid_utils::canonical_form(root_id, namespace) {
        Some(Ok(canonical)) => canonical,
        Some(Err(e)) => {
            debug!(root_id, error = %e, "Cannot canonicalize CID for subdomain redirect");
            return None;
        }
        None => root_id.to_string(),
    };

    let scheme = match forwarded_proto {
        Some("https") => "https",
        _ => "http",
    };
    let query = match raw_query {
        Some(query) if !query.is_empty() => format!("?{query}"),
        _ => String::new(),
    };

    let candidate = format!("{scheme}://{root_id}.{namespace}.{hostname}/{rest}{query}");
    let expected_host = format!("{root_id}.{namespace}.{}", strip_port(hostname));

    match safe_redirect_url(&candidate, &expected_host) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(error = %e, "Refusing subdomain redirect");
            None
        }
    }
}

/// Validate a redirect target: an absolute http(s) URL without credentials
/// or fragment whose host is exactly the subdomain we meant to build.
fn safe_redirect_url(candidate: &str, expected_host: &str) -> Result<String> {
    let unsafe_target = || HostnameError::UnsafeRedirectTarget(candidate.to_string());

    let url = Url::parse(candidate).map_err(|_| unsafe_target())?;

    if !matches!(url.scheme(), "http" | "https")
        || url.cannot_be_a_base()
        || !url.username().is_empty()
        || url.password().is_some()
        || url.fragment().is_some()
    {
        return Err(unsafe_target());
    }

    // Serializing drops a port that is the scheme default (`:80` for http)
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(expected_host) => Ok(url.into()),
        _ => Err(unsafe_target()),
    }
}
