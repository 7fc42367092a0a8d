//! Content namespaces recognized in gateway paths and subdomains

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A content namespace: the first path segment of `/ipfs/{cid}`,
/// `/ipns/{name}`, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Immutable content addressed by CID
    Ipfs,
    /// Mutable names (peer IDs or DNSLink domains)
    Ipns,
    /// IPLD data model paths
    Ipld,
    /// libp2p peer addressing
    P2p,
}

impl Namespace {
    /// All namespaces that may appear in a subdomain gateway hostname
    pub const ALL: [Namespace; 4] = [
        Namespace::Ipfs,
        Namespace::Ipns,
        Namespace::Ipld,
        Namespace::P2p,
    ];

    /// Get the namespace label as it appears in paths and hostnames
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Ipfs => "ipfs",
            Namespace::Ipns => "ipns",
            Namespace::Ipld => "ipld",
            Namespace::P2p => "p2p",
        }
    }

    /// Whether identifiers in this namespace are peer IDs, which must carry
    /// the libp2p-key multicodec
    pub fn is_peer_id(&self) -> bool {
        matches!(self, Namespace::Ipns | Namespace::P2p)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for labels that are not a known namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNamespace;

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipfs" => Ok(Namespace::Ipfs),
            "ipns" => Ok(Namespace::Ipns),
            "ipld" => Ok(Namespace::Ipld),
            "p2p" => Ok(Namespace::P2p),
            _ => Err(UnknownNamespace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_roundtrip() {
        for ns in Namespace::ALL {
            assert_eq!(ns.as_str().parse::<Namespace>(), Ok(ns));
        }
    }

    #[test]
    fn test_unknown_namespace() {
        assert!("api".parse::<Namespace>().is_err());
        assert!("IPFS".parse::<Namespace>().is_err());
        assert!("".parse::<Namespace>().is_err());
    }

    #[test]
    fn test_peer_id_namespaces() {
        assert!(Namespace::Ipns.is_peer_id());
        assert!(Namespace::P2p.is_peer_id());
        assert!(!Namespace::Ipfs.is_peer_id());
        assert!(!Namespace::Ipld.is_peer_id());
    }
}
