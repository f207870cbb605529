use async_trait::async_trait;

use crate::types::{Banner, BannerId};

/// Durable banner persistence.
/// Implementations: in-memory (server, tests); anything else plugs in here.
#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Load every banner. Ordering is unspecified.
    async fn list(&self) -> anyhow::Result<Vec<Banner>>;

    /// Load a single banner, or `None` if the id is unknown.
    async fn fetch_by_id(&self, id: BannerId) -> anyhow::Result<Option<Banner>>;

    /// Insert or replace a banner and return its id.
    ///
    /// A banner carrying [`BannerId::UNSET`] is assigned a fresh id.
    async fn save(&self, banner: Banner) -> anyhow::Result<BannerId>;

    /// Remove a banner, returning it if it existed.
    async fn delete(&self, id: BannerId) -> anyhow::Result<Option<Banner>>;
}

/// Single-slot holder of the currently selected banner.
#[async_trait]
pub trait ActiveBannerCache: Send + Sync {
    /// Current selection. `Ok(None)` means nothing has been selected yet.
    async fn get(&self) -> anyhow::Result<Option<Banner>>;

    /// Replace the current selection.
    async fn set(&self, banner: &Banner) -> anyhow::Result<()>;
}
