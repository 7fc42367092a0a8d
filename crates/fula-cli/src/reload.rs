//! Configuration reload
//!
//! `SIGHUP` re-reads the configuration file and publishes new hostname
//! settings. A file that fails to load leaves the current settings in place.

use crate::config::GatewayConfig;
use fula_hostname::HostnameRouter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Reload hostname settings from `path` into `router`
pub fn reload_settings(path: Option<&Path>, router: &HostnameRouter) -> anyhow::Result<()> {
    let config = GatewayConfig::load(path)?;
    router.reload(config.hostname_settings());
    Ok(())
}

/// Reload on every `SIGHUP` until the process exits
#[cfg(unix)]
pub async fn watch_sighup(path: Option<PathBuf>, router: Arc<HostnameRouter>) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    info!("SIGHUP reloads hostname settings");

    while hangup.recv().await.is_some() {
        info!(path = ?path, "SIGHUP received, reloading configuration");
        if let Err(e) = reload_settings(path.as_deref(), &router) {
            error!("Failed to reload config: {}. Keeping current configuration.", e);
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn watch_sighup(_path: Option<PathBuf>, _router: Arc<HostnameRouter>) -> anyhow::Result<()> {
    std::future::pending::<()>().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fula_hostname::{DnsLinkProbe, HostnameSettings, StaticNameResolver};

    fn router() -> HostnameRouter {
        HostnameRouter::new(
            HostnameSettings::default(),
            DnsLinkProbe::new(Arc::new(StaticNameResolver::new())),
        )
    }

    #[test]
    fn test_reload_applies_new_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(&path, "[public_gateways.\"gw.example.com\"]\nuse_subdomains = true\n").unwrap();

        let router = router();
        assert!(!router.settings().registry.contains("gw.example.com"));

        reload_settings(Some(path.as_path()), &router).unwrap();
        assert!(router.settings().registry.contains("gw.example.com"));
    }

    #[test]
    fn test_failed_reload_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(&path, "no_dnslink = \"sometimes\"\n").unwrap();

        let router = router();
        let before = router.settings();

        assert!(reload_settings(Some(path.as_path()), &router).is_err());
        assert!(Arc::ptr_eq(&before, &router.settings()));
    }
}
