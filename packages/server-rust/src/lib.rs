//! Banner server: HTTP API, storage adapters, and origin resolvers around
//! the `banner-core` selector.

pub mod config;
pub mod network;
pub mod origin;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use config::{LogFormat, OriginMode, ServerConfig};
pub use network::{DisplayOrigin, NetworkModule};
pub use origin::{LocalAddrResolver, PeerOriginResolver};
pub use service::{BannerService, ServiceError};
pub use storage::{InMemoryActiveCache, InMemoryBannerStore};
