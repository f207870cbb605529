//! Active banner selection.
//!
//! [`Selector::resolve`] answers "which banner should be shown now":
//!
//! 1. **Fast path**: the cached selection is returned as long as it has not
//!    expired. The store is not touched.
//! 2. **Slow path**: every banner is loaded, sorted by expiration (earliest
//!    first, stable for equal instants) and scanned. Expired banners are
//!    skipped. The first remaining banner wins if the caller's origin is
//!    privileged or the banner is inside its display window.
//! 3. The winner is written back to the cache before it is returned.
//!
//! The cache slot is shared by every caller. A selection made for the
//! service's own origin is always cached. A selection made for a
//! caller-supplied origin ([`Selector::resolve_with`]) is cached only when
//! the banner is inside its display window, so a privileged preview never
//! reaches other callers.
//!
//! The selector keeps no state between calls. Concurrent slow paths may both
//! recompute and both write; the last write wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::SelectionError;
use crate::origin::{OriginResolver, PrivilegedOrigins};
use crate::traits::{ActiveBannerCache, BannerStore};
use crate::types::Banner;

/// Picks the banner to display and keeps the active-banner cache current.
pub struct Selector {
    store: Arc<dyn BannerStore>,
    cache: Arc<dyn ActiveBannerCache>,
    origin: Arc<dyn OriginResolver>,
    privileged: PrivilegedOrigins,
    clock: Arc<dyn Clock>,
}

impl Selector {
    /// Creates a selector with the system clock and the default privileged origins.
    #[must_use]
    pub fn new(
        store: Arc<dyn BannerStore>,
        cache: Arc<dyn ActiveBannerCache>,
        origin: Arc<dyn OriginResolver>,
    ) -> Self {
        Self {
            store,
            cache,
            origin,
            privileged: PrivilegedOrigins::default(),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_privileged_origins(mut self, privileged: PrivilegedOrigins) -> Self {
        self.privileged = privileged;
        self
    }

    /// Resolve the active banner using the configured origin resolver.
    ///
    /// # Errors
    ///
    /// See [`resolve_at`](Self::resolve_at).
    pub async fn resolve(&self) -> Result<Banner, SelectionError> {
        self.resolve_at(self.clock.now()).await
    }

    /// Resolve the active banner for a caller-specific origin.
    ///
    /// A banner shown only because the caller is privileged is returned but
    /// not cached.
    ///
    /// # Errors
    ///
    /// See [`resolve_at`](Self::resolve_at).
    pub async fn resolve_with(
        &self,
        origin: &dyn OriginResolver,
    ) -> Result<Banner, SelectionError> {
        self.select(self.clock.now(), origin, Scope::Caller).await
    }

    /// Resolve the active banner as of `now` using the configured origin
    /// resolver.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::CacheUnavailable`] if the cache read fails.
    /// - [`SelectionError::StoreUnavailable`] if listing banners fails.
    /// - [`SelectionError::OriginResolutionFailed`] if the origin is needed and
    ///   cannot be resolved.
    /// - [`SelectionError::NoActiveBanner`] if no banner qualifies.
    /// - [`SelectionError::CacheWriteFailed`] if the winner cannot be cached.
    ///
    /// The cache is written only on success.
    pub async fn resolve_at(&self, now: DateTime<Utc>) -> Result<Banner, SelectionError> {
        self.select(now, self.origin.as_ref(), Scope::Service).await
    }

    async fn select(
        &self,
        now: DateTime<Utc>,
        origin: &dyn OriginResolver,
        scope: Scope,
    ) -> Result<Banner, SelectionError> {
        let cached = self.cache.get().await.map_err(|e| {
            warn!(error = %e, "active banner cache read failed");
            SelectionError::CacheUnavailable(e)
        })?;

        if let Some(banner) = cached {
            if !banner.is_expired(&now) {
                debug!(banner_id = %banner.id, "serving cached active banner");
                return Ok(banner);
            }
            debug!(banner_id = %banner.id, "cached active banner expired");
        }

        let candidates = self.store.list().await.map_err(|e| {
            warn!(error = %e, "banner store list failed");
            SelectionError::StoreUnavailable(e)
        })?;

        let winner = pick_active(candidates, &now, origin, &self.privileged)?
            .ok_or(SelectionError::NoActiveBanner)?;

        if scope == Scope::Caller && !winner.is_in_display_period(&now) {
            debug!(banner_id = %winner.id, "previewed banner not cached");
            return Ok(winner);
        }

        if let Err(e) = self.cache.set(&winner).await {
            warn!(banner_id = %winner.id, error = %e, "active banner cache write failed");
            return Err(SelectionError::CacheWriteFailed {
                banner_id: winner.id,
                source: e,
            });
        }

        info!(banner_id = %winner.id, name = %winner.name, "selected new active banner");
        Ok(winner)
    }
}

/// Whose origin a selection was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The configured resolver; shared by every caller.
    Service,
    /// A per-request origin.
    Caller,
}

/// Scans `candidates` for the banner to show at `now`.
///
/// Candidates are ordered by expiration ascending; equal expirations keep
/// their listing order. The origin is resolved at most once, when the first
/// non-expired candidate is reached, and reused for the rest of the scan.
///
/// # Errors
///
/// Returns [`SelectionError::OriginResolutionFailed`] if the origin lookup
/// fails; the scan does not fall through to later candidates.
pub fn pick_active(
    mut candidates: Vec<Banner>,
    now: &DateTime<Utc>,
    origin: &dyn OriginResolver,
    privileged: &PrivilegedOrigins,
) -> Result<Option<Banner>, SelectionError> {
    candidates.sort_by_key(Banner::expires_at_utc);

    let mut is_privileged: Option<bool> = None;

    for banner in candidates {
        if banner.is_expired(now) {
            continue;
        }

        let bypass_window = if let Some(p) = is_privileged {
            p
        } else {
            let resolved = origin.resolve().map_err(|e| {
                warn!(error = %e, "caller origin resolution failed");
                SelectionError::OriginResolutionFailed(e)
            })?;
            let p = privileged.contains(&resolved);
            debug!(origin = %resolved, privileged = p, "resolved caller origin");
            is_privileged = Some(p);
            p
        };

        if bypass_window || banner.is_in_display_period(now) {
            return Ok(Some(banner));
        }
    }

    Ok(None)
}
