//! # Fula Hostname
//!
//! Hostname-based request routing for Fula IPFS gateways.
//!
//! This crate provides:
//! - **Gateway registry**: Known public gateways, path or subdomain style
//! - **Subdomain gateways**: `{cid}.ipfs.{gateway}` requests mapped to `/ipfs/{cid}`
//! - **Redirects**: Path requests on subdomain gateways redirected to their origin
//! - **CID canonicalization**: CIDv1 base32 with the libp2p-key codec for peer IDs
//! - **DNSLink**: `/ipns/{host}` routing for hosts that publish a DNSLink record
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           hostname_middleware           │
//! ├─────────────────────────────────────────┤
//! │             HostnameRouter              │
//! ├──────────────────┬──────────────────────┤
//! │ HostnameSettings │     DnsLinkProbe     │
//! │ (GatewayRegistry)├──────────┬───────────┤
//! │                  │   Kubo   │  Static   │
//! └──────────────────┴──────────┴───────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use fula_hostname::{DnsLinkProbe, HostnameRouter, HostnameSettings, KuboConfig, KuboNameResolver};
//!
//! let resolver = KuboNameResolver::new(KuboConfig::default())?;
//! let router = Arc::new(HostnameRouter::new(
//!     HostnameSettings::default(),
//!     DnsLinkProbe::new(Arc::new(resolver)),
//! ));
//! let app = Router::new()
//!     .fallback_service(content)
//!     .layer(middleware::from_fn_with_state(router, hostname_middleware));
//! ```

pub mod cid_utils;
pub mod dnslink;
pub mod error;
pub mod gateway;
pub mod host;
pub mod kubo;
pub mod middleware;
pub mod namespace;
pub mod redirect;
pub mod router;
pub mod subdomain;

pub use cid_utils::CidCodec;
pub use dnslink::{DnsLinkProbe, NameResolver, ResolveError, StaticNameResolver};
pub use error::{HostnameError, Result};
pub use gateway::{
    builtin_gateways, GatewayOverride, GatewayRegistry, GatewaySpec, HostnameSettings,
    DEFAULT_PATHS,
};
pub use kubo::{KuboConfig, KuboNameResolver};
pub use middleware::hostname_middleware;
pub use namespace::Namespace;
pub use redirect::{has_prefix, to_subdomain_url};
pub use router::{HostnameRouter, RouteDecision, RouteRequest};
pub use subdomain::{parse_subdomains, subdomain_candidates, ParsedSubdomain};
