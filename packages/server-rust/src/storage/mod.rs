//! Storage adapters for the banner server.
//!
//! Provides in-process implementations of the collaborator traits defined
//! in `banner-core`:
//!
//! - [`InMemoryBannerStore`]: banner records keyed by id ([`BannerStore`])
//! - [`InMemoryActiveCache`]: the single active-selection slot ([`ActiveBannerCache`])
//!
//! [`BannerStore`]: banner_core::BannerStore
//! [`ActiveBannerCache`]: banner_core::ActiveBannerCache

pub mod active;
pub mod memory;

pub use active::*;
pub use memory::*;
