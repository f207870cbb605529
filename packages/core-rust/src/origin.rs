//! Caller network origin and the privileged-origin override.

use std::collections::BTreeSet;

/// Origins that skip the display-window check.
pub const DEFAULT_PRIVILEGED_ORIGINS: [&str; 2] = ["10.0.0.1", "10.0.0.2"];

/// Reports the caller's network origin as an opaque string.
///
/// Implementations may look at the local interface, the remote peer, or a
/// fixed value. Failures abort the whole selection attempt.
pub trait OriginResolver: Send + Sync {
    /// Resolve the current origin.
    fn resolve(&self) -> anyhow::Result<String>;
}

/// Set of internal diagnostic origins.
///
/// Callers whose origin is in this set see the earliest-expiring banner that
/// has not expired yet, even if its display window has not started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedOrigins {
    origins: BTreeSet<String>,
}

impl PrivilegedOrigins {
    /// Builds a set from arbitrary origin strings. Surrounding whitespace is trimmed
    /// and empty entries are dropped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            origins: origins
                .into_iter()
                .map(|o| o.as_ref().trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// A set with no members: every caller is subject to the display window.
    #[must_use]
    pub fn none() -> Self {
        Self {
            origins: BTreeSet::new(),
        }
    }

    /// Exact match after trimming.
    #[must_use]
    pub fn contains(&self, origin: &str) -> bool {
        self.origins.contains(origin.trim())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

impl Default for PrivilegedOrigins {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVILEGED_ORIGINS)
    }
}

/// Resolver that always reports the same origin.
#[derive(Debug, Clone)]
pub struct StaticOriginResolver {
    origin: String,
}

impl StaticOriginResolver {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

impl OriginResolver for StaticOriginResolver {
    fn resolve(&self) -> anyhow::Result<String> {
        Ok(self.origin.clone())
    }
}
