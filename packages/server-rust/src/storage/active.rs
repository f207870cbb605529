//! In-memory [`ActiveBannerCache`] implementation backed by [`ArcSwapOption`].
//!
//! Reads are lock-free; writes replace the slot atomically. There is no
//! compare-and-swap: concurrent writers race and the last one wins.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use banner_core::{ActiveBannerCache, Banner};

/// Single-slot active banner cache.
#[derive(Debug, Default)]
pub struct InMemoryActiveCache {
    slot: ArcSwapOption<Banner>,
}

impl InMemoryActiveCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the current selection so the next lookup recomputes it.
    pub fn clear(&self) {
        self.slot.store(None);
    }

    /// Current selection without going through the async trait.
    #[must_use]
    pub fn peek(&self) -> Option<Banner> {
        self.slot.load_full().map(|b| (*b).clone())
    }
}

#[async_trait]
impl ActiveBannerCache for InMemoryActiveCache {
    async fn get(&self) -> anyhow::Result<Option<Banner>> {
        Ok(self.peek())
    }

    async fn set(&self, banner: &Banner) -> anyhow::Result<()> {
        self.slot.store(Some(Arc::new(banner.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banner_core::BannerId;

    fn named(id: i64) -> Banner {
        Banner {
            id: BannerId(id),
            name: format!("banner-{id}"),
            ..Banner::default()
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let cache = InMemoryActiveCache::new();
        assert!(cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_replaces_selection() {
        let cache = InMemoryActiveCache::new();
        cache.set(&named(1)).await.unwrap();
        cache.set(&named(2)).await.unwrap();
        assert_eq!(cache.get().await.unwrap().unwrap().id, BannerId(2));
    }

    #[tokio::test]
    async fn clear_empties_slot() {
        let cache = InMemoryActiveCache::new();
        cache.set(&named(1)).await.unwrap();
        cache.clear();
        assert!(cache.peek().is_none());
    }
}
