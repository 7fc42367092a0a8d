//! Host header utilities
//!
//! Splitting `host:port` pairs and checking whether a hostname is a DNS
//! name under a known public suffix.

use crate::{HostnameError, Result};

/// Maximum length of a DNS name, excluding the trailing root dot
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single DNS label
const MAX_LABEL_LEN: usize = 63;

/// Top-level domains outside the ICANN root that still carry DNSLink records
const EXTENDED_TLDS: &[&str] = &["bit", "crypto", "eth", "onion"];

/// Split `host:port`, `[ipv6]:port` or `[ipv6%zone]:port` into host and port.
///
/// The port may be empty (`"example.com:"`). Hosts without a port, or with
/// more colons than a bracketed literal allows, are rejected.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str)> {
    let colon = hostport
        .rfind(':')
        .ok_or_else(|| HostnameError::malformed_host(hostport, "missing port"))?;

    let (host, inner_start, outer_start) = if hostport.starts_with('[') {
        let end = hostport
            .find(']')
            .ok_or_else(|| HostnameError::malformed_host(hostport, "missing ']'"))?;
        if end + 1 == hostport.len() {
            return Err(HostnameError::malformed_host(hostport, "missing port"));
        }
        if end + 1 != colon {
            let reason = if hostport.as_bytes()[end + 1] == b':' {
                "too many colons"
            } else {
                "missing port"
            };
            return Err(HostnameError::malformed_host(hostport, reason));
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(HostnameError::malformed_host(hostport, "too many colons"));
        }
        (host, 0, 0)
    };

    if hostport[inner_start..].contains('[') {
        return Err(HostnameError::malformed_host(hostport, "unexpected '['"));
    }
    if hostport[outer_start..].contains(']') {
        return Err(HostnameError::malformed_host(hostport, "unexpected ']'"));
    }

    Ok((host, &hostport[colon + 1..]))
}

/// Remove the `:port` suffix from a Host header value.
///
/// Values without a well-formed port are returned unchanged, which makes
/// the operation idempotent.
pub fn strip_port(hostname: &str) -> &str {
    match split_host_port(hostname) {
        Ok((host, _)) => host,
        Err(_) => hostname,
    }
}

/// Check whether `name` is a fully qualified domain name under a known suffix.
///
/// Requires at least two labels, letters, digits and inner hyphens only,
/// and a suffix listed in the Public Suffix List or one of a few non-ICANN
/// TLDs. Private names such as `host.local` and IPv4 literals are rejected.
/// A single trailing root dot is accepted.
pub fn is_domain(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();
    if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_label(label)) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    EXTENDED_TLDS.contains(&tld)
        || psl::suffix(name.as_bytes()).is_some_and(|suffix| suffix.is_known())
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("localhost:8080", "localhost")]
    #[case(
        "bafkreicysg23kiwv34eg2d7qweipxwosdo2py4ldv42nbauguluen5v6am.ipfs.localhost:8080",
        "bafkreicysg23kiwv34eg2d7qweipxwosdo2py4ldv42nbauguluen5v6am.ipfs.localhost"
    )]
    #[case("example.com:443", "example.com")]
    #[case("example.com", "example.com")]
    #[case("foo-dweb.ipfs.pvt.k12.ma.us:8080", "foo-dweb.ipfs.pvt.k12.ma.us")]
    #[case("localhost", "localhost")]
    #[case("[::1]:8080", "::1")]
    #[case("::1", "::1")]
    #[case("example.com:", "example.com")]
    fn test_strip_port(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_port(input), expected);
        assert_eq!(strip_port(strip_port(input)), expected);
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("localhost:8080").unwrap(), ("localhost", "8080"));
        assert_eq!(split_host_port("[::1]:443").unwrap(), ("::1", "443"));
        assert_eq!(
            split_host_port("[fe80::1%eth0]:80").unwrap(),
            ("fe80::1%eth0", "80")
        );
    }

    #[rstest]
    #[case("localhost")]
    #[case("::1")]
    #[case("[::1]")]
    #[case("[::1]x")]
    #[case("[::1]:80:90")]
    #[case("a:b:c")]
    #[case("[a]:b]:80")]
    fn test_split_host_port_rejects(#[case] input: &str) {
        assert!(matches!(
            split_host_port(input),
            Err(HostnameError::MalformedHost { .. })
        ));
    }

    #[test]
    fn test_is_domain() {
        assert!(is_domain("example.com"));
        assert!(is_domain("en.wikipedia-on-ipfs.org"));
        assert!(is_domain("docs.ipfs.tech."));
        assert!(is_domain("xn--bcher-kva.ch"));
        assert!(is_domain("Example.COM"));
        assert!(is_domain("vitalik.eth"));
        assert!(is_domain("pvt.k12.ma.us"));

        assert!(!is_domain(""));
        assert!(!is_domain("localhost"));
        assert!(!is_domain("127.0.0.1"));
        assert!(!is_domain("::1"));
        assert!(!is_domain("-bad.example.com"));
        assert!(!is_domain("bad-.example.com"));
        assert!(!is_domain("a..b.com"));
        assert!(!is_domain("has space.com"));
        assert!(!is_domain(&format!("{}.com", "a".repeat(64))));
    }

    #[rstest]
    #[case("host.local")]
    #[case("foo.internal")]
    #[case("printer.lan")]
    #[case("site.example")]
    #[case("1.2.3.4")]
    fn test_is_domain_rejects_unknown_suffix(#[case] name: &str) {
        assert!(!is_domain(name));
    }
}
