//! HTTP handler definitions for the banner server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for building the router.

pub mod banners;
pub mod health;

pub use banners::{
    active_banner_handler, create_banner_handler, delete_banner_handler, get_banner_handler,
    list_banners_handler, update_banner_handler,
};
pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::service::BannerService;

/// How the display handler picks the origin passed to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOrigin {
    /// Use the selector's configured resolver.
    Configured,
    /// Use each request's remote peer address.
    Peer,
}

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Banner use cases.
    pub service: Arc<BannerService>,
    /// Origin source for `GET /banners/active`.
    pub display_origin: DisplayOrigin,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
