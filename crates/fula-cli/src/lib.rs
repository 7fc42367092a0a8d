//! # Fula Gateway
//!
//! IPFS HTTP gateway server with hostname-based routing.
//!
//! This crate provides:
//! - **Hostname routing**: Subdomain gateways, redirects and DNSLink via `fula-hostname`
//! - **Content relay**: Routed requests are served by an upstream IPFS gateway
//! - **Configuration**: TOML file, environment and CLI, reloaded on SIGHUP
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │         (browsers, curl, reverse proxies)           │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                    Fula Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │   Request ID │ Logging │ Hostname Router (redirect, │
//! │              │         │   rewrite, 404, forward)   │
//! ├─────────────────────────────────────────────────────┤
//! │          Content Handler (GET / HEAD relay)         │
//! ├──────────────────────────┬──────────────────────────┤
//! │     Upstream gateway     │   IPFS RPC (name/resolve) │
//! └──────────────────────────┴──────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod reload;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GatewayConfig, PublicGatewayEntry};
pub use error::ApiError;
pub use server::{run_server, serve};
pub use state::AppState;
