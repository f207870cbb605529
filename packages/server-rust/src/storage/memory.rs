//! In-memory [`BannerStore`] implementation backed by [`DashMap`].
//!
//! Provides concurrent read/write access without external locking. Ids are
//! handed out from an atomic counter, so they are unique for the lifetime of
//! the store even after deletes.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use banner_core::{Banner, BannerId, BannerStore};
use dashmap::DashMap;

/// In-memory banner storage.
pub struct InMemoryBannerStore {
    banners: DashMap<BannerId, Banner>,
    next_id: AtomicI64,
}

impl InMemoryBannerStore {
    /// Creates a new, empty store. The first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banners: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored banners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.banners.len()
    }

    /// Whether the store holds no banners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    fn allocate_id(&self) -> BannerId {
        BannerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for InMemoryBannerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BannerStore for InMemoryBannerStore {
    async fn list(&self) -> anyhow::Result<Vec<Banner>> {
        Ok(self
            .banners
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn fetch_by_id(&self, id: BannerId) -> anyhow::Result<Option<Banner>> {
        Ok(self.banners.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, mut banner: Banner) -> anyhow::Result<BannerId> {
        if banner.id.is_unset() {
            banner.id = self.allocate_id();
        } else {
            // Keep the counter ahead of explicitly supplied ids.
            self.next_id.fetch_max(banner.id.0 + 1, Ordering::Relaxed);
        }
        let id = banner.id;
        self.banners.insert(id, banner);
        Ok(id)
    }

    async fn delete(&self, id: BannerId) -> anyhow::Result<Option<Banner>> {
        Ok(self.banners.remove(&id).map(|(_, b)| b))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn sample(name: &str) -> Banner {
        Banner::new(
            name,
            Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap().fixed_offset(),
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().fixed_offset(),
        )
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = InMemoryBannerStore::new();
        let a = store.save(sample("a")).await.unwrap();
        let b = store.save(sample("b")).await.unwrap();
        assert_eq!(a, BannerId(1));
        assert_eq!(b, BannerId(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn save_with_id_replaces_record() {
        let store = InMemoryBannerStore::new();
        let id = store.save(sample("a")).await.unwrap();

        let mut updated = store.fetch_by_id(id).await.unwrap().unwrap();
        updated.name = "renamed".to_string();
        assert_eq!(store.save(updated).await.unwrap(), id);

        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_by_id(id).await.unwrap().unwrap().name, "renamed");
    }

    #[tokio::test]
    async fn explicit_ids_do_not_collide_with_assigned_ones() {
        let store = InMemoryBannerStore::new();
        let mut explicit = sample("explicit");
        explicit.id = BannerId(10);
        store.save(explicit).await.unwrap();

        let next = store.save(sample("next")).await.unwrap();
        assert_eq!(next, BannerId(11));
    }

    #[tokio::test]
    async fn fetch_unknown_id_returns_none() {
        let store = InMemoryBannerStore::new();
        assert!(store.fetch_by_id(BannerId(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_every_banner() {
        let store = InMemoryBannerStore::new();
        store.save(sample("a")).await.unwrap();
        store.save(sample("b")).await.unwrap();
        let mut names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn delete_removes_and_returns_record() {
        let store = InMemoryBannerStore::new();
        let id = store.save(sample("a")).await.unwrap();

        let removed = store.delete(id).await.unwrap().unwrap();
        assert_eq!(removed.name, "a");
        assert!(store.is_empty());
        assert!(store.delete(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryBannerStore::new();
        let first = store.save(sample("a")).await.unwrap();
        store.delete(first).await.unwrap();
        let second = store.save(sample("b")).await.unwrap();
        assert_ne!(first, second);
    }

    proptest! {
        /// `None` saves a new banner, `Some(id)` saves under an explicit id.
        #[test]
        fn assigned_ids_never_collide(
            ops in prop::collection::vec(prop::option::of(1i64..500), 1..40),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let store = InMemoryBannerStore::new();
            let mut seen = HashSet::new();

            for op in ops {
                let mut banner = sample("b");
                if let Some(id) = op {
                    banner.id = BannerId(id);
                }
                let id = rt.block_on(store.save(banner)).unwrap();
                match op {
                    Some(explicit) => prop_assert_eq!(id, BannerId(explicit)),
                    None => prop_assert!(!seen.contains(&id), "reassigned {}", id),
                }
                seen.insert(id);
            }

            prop_assert_eq!(store.len(), seen.len());
        }
    }
}
