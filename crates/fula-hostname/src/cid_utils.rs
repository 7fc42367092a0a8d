//! CID (Content Identifier) utilities
//!
//! Decodes identifiers found in paths and subdomains and re-encodes them in
//! the form used by subdomain gateways: CIDv1 in lowercase base32, which
//! survives the case-folding browsers apply to hostnames.

use crate::{HostnameError, Namespace, Result};
use cid::multibase::Base;
use cid::Cid;

/// Multicodecs the gateway knows by name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CidCodec {
    /// Raw binary data (0x55)
    Raw,
    /// DAG-PB/Protobuf (0x70)
    DagPb,
    /// DAG-CBOR (0x71)
    DagCbor,
    /// libp2p public key (0x72)
    Libp2pKey,
    /// DAG-JSON (0x0129)
    DagJson,
}

impl CidCodec {
    /// Get the multicodec code
    pub fn code(&self) -> u64 {
        match self {
            CidCodec::Raw => 0x55,
            CidCodec::DagPb => 0x70,
            CidCodec::DagCbor => 0x71,
            CidCodec::Libp2pKey => 0x72,
            CidCodec::DagJson => 0x0129,
        }
    }

    /// Parse from multicodec code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0x55 => Some(CidCodec::Raw),
            0x70 => Some(CidCodec::DagPb),
            0x71 => Some(CidCodec::DagCbor),
            0x72 => Some(CidCodec::Libp2pKey),
            0x0129 => Some(CidCodec::DagJson),
            _ => None,
        }
    }
}

/// Decode a CID from its textual form (CIDv0 base58 or any multibase CIDv1)
pub fn decode(text: &str) -> Result<Cid> {
    Cid::try_from(text).map_err(|_| HostnameError::MalformedIdentifier(text.to_string()))
}

/// Get the codec of a CID, if it is one the gateway knows by name
pub fn codec_of(cid: &Cid) -> Option<CidCodec> {
    CidCodec::from_code(cid.codec())
}

/// Whether the CID is tagged as a libp2p public key
pub fn is_libp2p_key(cid: &Cid) -> bool {
    cid.codec() == CidCodec::Libp2pKey.code()
}

/// Encode a CID in its canonical subdomain form for the given namespace.
///
/// Peer IDs (`ipns`, `p2p`) are re-tagged with the libp2p-key multicodec if
/// they were published with another one; the multihash is kept as-is.
pub fn canonicalize(cid: &Cid, namespace: Namespace) -> Result<String> {
    let codec = if namespace.is_peer_id() && !is_libp2p_key(cid) {
        CidCodec::Libp2pKey.code()
    } else {
        cid.codec()
    };

    Cid::new_v1(codec, *cid.hash())
        .to_string_of_base(Base::Base32Lower)
        .map_err(HostnameError::from)
}

/// Decode `text` and canonicalize it, or `None` if it is not a CID
pub fn canonical_form(text: &str, namespace: Namespace) -> Option<Result<String>> {
    decode(text).ok().map(|cid| canonicalize(&cid, namespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use multihash_codetable::{Code, MultihashDigest};

    const RAW_CID: &str = "bafkreicysg23kiwv34eg2d7qweipxwosdo2py4ldv42nbauguluen5v6am";
    const KEY_CID: &str = "bafzbeihe35nmjqar22thmxsnlsgxppd66pseq6tscs4mo25y55juhh6bju";

    #[test]
    fn test_decode_reports_codec() {
        let raw = decode(RAW_CID).unwrap();
        assert_eq!(codec_of(&raw), Some(CidCodec::Raw));
        assert!(!is_libp2p_key(&raw));

        let key = decode(KEY_CID).unwrap();
        assert_eq!(codec_of(&key), Some(CidCodec::Libp2pKey));
        assert!(is_libp2p_key(&key));
    }

    #[test]
    fn test_decode_rejects_labels() {
        for text in ["en.wikipedia-on-ipfs.org", "peerid", "", "bafy"] {
            assert_eq!(
                decode(text),
                Err(HostnameError::MalformedIdentifier(text.to_string()))
            );
        }
    }

    #[test]
    fn test_canonicalize_v0_to_base32_v1() {
        let v0 = Cid::new_v0(Code::Sha2_256.digest(b"hello fula")).unwrap();
        let text = v0.to_string();
        assert!(text.starts_with("Qm"));

        let canonical = canonicalize(&decode(&text).unwrap(), Namespace::Ipfs).unwrap();
        assert!(canonical.starts_with("bafybei"));
        assert_eq!(canonical, Cid::new_v1(0x70, *v0.hash()).to_string());
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for ns in Namespace::ALL {
            let once = canonicalize(&decode(RAW_CID).unwrap(), ns).unwrap();
            let twice = canonicalize(&decode(&once).unwrap(), ns).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_canonicalize_uppercase_base32() {
        let upper = format!("B{}", RAW_CID[1..].to_ascii_uppercase());
        let canonical = canonicalize(&decode(&upper).unwrap(), Namespace::Ipfs).unwrap();
        assert_eq!(canonical, RAW_CID);
    }

    #[test]
    fn test_canonicalize_fixes_peer_id_codec() {
        let raw = decode(RAW_CID).unwrap();

        let ipfs = canonicalize(&raw, Namespace::Ipfs).unwrap();
        assert_eq!(ipfs, RAW_CID);

        for ns in [Namespace::Ipns, Namespace::P2p] {
            let fixed = decode(&canonicalize(&raw, ns).unwrap()).unwrap();
            assert!(is_libp2p_key(&fixed));
            assert_eq!(fixed.hash(), raw.hash());
        }

        let key = canonicalize(&decode(KEY_CID).unwrap(), Namespace::Ipns).unwrap();
        assert_eq!(key, KEY_CID);
    }

    #[test]
    fn test_canonical_form() {
        assert!(canonical_form("dist.ipfs.io", Namespace::Ipns).is_none());
        assert_eq!(
            canonical_form(RAW_CID, Namespace::Ipfs),
            Some(Ok(RAW_CID.to_string()))
        );
    }

    #[test]
    fn test_codec_roundtrip() {
        for codec in [
            CidCodec::Raw,
            CidCodec::DagPb,
            CidCodec::DagCbor,
            CidCodec::Libp2pKey,
            CidCodec::DagJson,
        ] {
            assert_eq!(CidCodec::from_code(codec.code()), Some(codec));
        }
    }
}
