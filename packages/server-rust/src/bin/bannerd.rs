//! `bannerd`: runs the banner HTTP server until Ctrl-C.

use std::sync::Arc;

use banner_core::{OriginResolver, Selector, StaticOriginResolver, SystemClock};
use banner_server::config::{OriginMode, ServerConfig};
use banner_server::network::{DisplayOrigin, NetworkModule};
use banner_server::origin::{LocalAddrResolver, PeerOriginResolver};
use banner_server::service::BannerService;
use banner_server::storage::{InMemoryActiveCache, InMemoryBannerStore};
use banner_server::telemetry::{init_metrics, init_tracing};
use clap::Parser;
use tracing::{info, warn};

fn origin_for(config: &ServerConfig) -> (Arc<dyn OriginResolver>, DisplayOrigin) {
    match config.origin_mode {
        OriginMode::Local => (
            Arc::new(LocalAddrResolver::new(config.route_probe.clone())),
            DisplayOrigin::Configured,
        ),
        OriginMode::Static => (
            Arc::new(StaticOriginResolver::new(
                config.static_origin.clone().unwrap_or_default(),
            )),
            DisplayOrigin::Configured,
        ),
        // Handlers pass each request's peer address; a selection made without
        // one has no caller to resolve and fails.
        OriginMode::Peer => (
            Arc::new(PeerOriginResolver::new(None)),
            DisplayOrigin::Peer,
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    let privileged = config.privileged_origins();
    if privileged.is_empty() {
        warn!("no privileged origins configured; previews are disabled");
    }

    let store = Arc::new(InMemoryBannerStore::new());
    let cache = Arc::new(InMemoryActiveCache::new());
    let clock = Arc::new(SystemClock);
    let (resolver, display_origin) = origin_for(&config);

    let selector = Selector::new(store.clone(), cache, resolver)
        .with_clock(clock.clone())
        .with_privileged_origins(privileged);
    let service = Arc::new(BannerService::new(store, Arc::new(selector), clock));

    let mut network = NetworkModule::new(config.network_config(), service, display_origin);
    let port = network.start().await?;
    info!(
        port,
        origin_mode = ?config.origin_mode,
        "bannerd started"
    );

    network
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl-C");
            }
        })
        .await?;

    info!("bannerd stopped");
    Ok(())
}
