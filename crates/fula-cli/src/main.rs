//! Fula Gateway - IPFS HTTP gateway with hostname-based routing

use clap::Parser;
use fula_cli::{run_server, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fula-gateway")]
#[command(about = "IPFS HTTP gateway with subdomain and DNSLink routing")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "FULA_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long, env = "FULA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FULA_PORT")]
    port: Option<u16>,

    /// IPFS API URL
    #[arg(long, env = "IPFS_API_URL")]
    ipfs_url: Option<String>,

    /// Gateway serving content for routed requests
    #[arg(long, env = "FULA_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, env = "FULA_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("fula_cli={0},fula_hostname={0},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build configuration
    let mut config = GatewayConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ipfs_url) = args.ipfs_url {
        config.ipfs_api_url = ipfs_url;
    }
    if let Some(upstream_url) = args.upstream_url {
        config.upstream_url = upstream_url;
    }

    tracing::info!("Starting Fula Gateway on {}:{}", config.host, config.port);
    tracing::info!("IPFS API: {}", config.ipfs_api_url);
    if let Some(ref path) = args.config {
        tracing::info!("Config file: {}", path.display());
    }
    if config.no_dnslink {
        tracing::warn!("DNSLink is disabled for unknown hostnames");
    }

    // Run the server
    run_server(config, args.config).await
}
