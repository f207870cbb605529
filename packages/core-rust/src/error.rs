use crate::types::BannerId;

/// Reasons a selection attempt fails. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("active banner cache unavailable: {0}")]
    CacheUnavailable(#[source] anyhow::Error),
    #[error("banner store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("failed to resolve caller origin: {0}")]
    OriginResolutionFailed(#[source] anyhow::Error),
    #[error("no active banner found")]
    NoActiveBanner,
    #[error("failed to cache selected banner {banner_id}: {source}")]
    CacheWriteFailed {
        banner_id: BannerId,
        #[source]
        source: anyhow::Error,
    },
}

impl SelectionError {
    /// Stable snake-case name of the error kind, for logs and responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CacheUnavailable(_) => "cache_unavailable",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::OriginResolutionFailed(_) => "origin_resolution_failed",
            Self::NoActiveBanner => "no_active_banner",
            Self::CacheWriteFailed { .. } => "cache_write_failed",
        }
    }
}
