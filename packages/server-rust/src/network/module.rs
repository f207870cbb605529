//! Network module with deferred startup lifecycle.
//!
//! `new()` creates resources, `start()` binds the TCP listener, and `serve()`
//! accepts connections. The split lets the binary report the bound port (or
//! fail fast on a port conflict) before it starts serving.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    active_banner_handler, create_banner_handler, delete_banner_handler, get_banner_handler,
    health_handler, list_banners_handler, liveness_handler, readiness_handler,
    update_banner_handler, AppState, DisplayOrigin,
};
use super::middleware::with_http_layers;
use super::shutdown::{track_in_flight, ShutdownController};
use crate::service::BannerService;

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `GET /health`, `GET /health/live`, `GET /health/ready`
/// - `GET|POST /banners`
/// - `GET /banners/active`
/// - `GET|PATCH|DELETE /banners/{id}`
///
/// Banner routes count as in-flight requests and are refused while draining;
/// health routes always answer.
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    let banners = Router::new()
        .route(
            "/banners",
            get(list_banners_handler).post(create_banner_handler),
        )
        .route("/banners/active", get(active_banner_handler))
        .route(
            "/banners/{id}",
            get(get_banner_handler)
                .patch(update_banner_handler)
                .delete(delete_banner_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.shutdown),
            track_in_flight,
        ));

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .merge(banners)
        .with_state(state);

    with_http_layers(router, config)
}

/// Manages the HTTP server lifecycle.
///
/// 1. `new()` -- allocates shared state (shutdown controller)
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    service: Arc<BannerService>,
    display_origin: DisplayOrigin,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        service: Arc<BannerService>,
        display_origin: DisplayOrigin,
    ) -> Self {
        Self {
            config,
            listener: None,
            service,
            display_origin,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    fn app_state(&self) -> AppState {
        AppState {
            service: Arc::clone(&self.service),
            display_origin: self.display_origin,
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        }
    }

    /// Binds the TCP listener and returns the bound port (OS-assigned when
    /// the configured port is 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the `shutdown` future resolves.
    ///
    /// When it resolves the health state moves to Draining, new banner
    /// requests get 503, and in-flight requests get up to `drain_timeout`
    /// to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called or the server hits a
    /// fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        let router = build_router(self.app_state(), &self.config);
        let controller = Arc::clone(&self.shutdown);
        let signal = async move {
            shutdown.await;
            info!("shutdown signal received, draining");
            controller.trigger_shutdown();
        };

        self.shutdown.set_ready();
        info!("Serving HTTP connections");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal)
        .await?;

        if self.shutdown.wait_for_drain(self.config.drain_timeout).await {
            info!("All requests drained");
        } else {
            warn!("Drain timeout expired with in-flight requests remaining");
        }
        Ok(())
    }
}
