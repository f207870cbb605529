use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned banner identifier. Zero means "not yet persisted".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BannerId(pub i64);

impl BannerId {
    /// Identifier carried by a banner that has not been saved yet.
    pub const UNSET: Self = Self(0);

    /// Whether this identifier was never assigned by a store.
    #[must_use]
    pub fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BannerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// The earliest representable instant, used for timestamps that were never set.
///
/// Unset timestamps take part in comparisons like any other instant.
#[must_use]
pub fn unset_instant() -> DateTime<FixedOffset> {
    DateTime::<Utc>::MIN_UTC.fixed_offset()
}

/// Whether `at` is the unset sentinel returned by [`unset_instant`].
#[must_use]
pub fn is_unset_instant(at: &DateTime<FixedOffset>) -> bool {
    *at == unset_instant()
}

/// A promotional banner with a scheduled display window.
///
/// Timestamps keep the offset they were created with. All predicates compare
/// absolute instants, so two banners whose timestamps differ only in offset
/// behave identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Store-assigned identifier; [`BannerId::UNSET`] before creation.
    pub id: BannerId,
    /// Display name. Never empty for a persisted banner.
    pub name: String,
    /// Set once when the banner is created.
    pub created_at: DateTime<FixedOffset>,
    /// Start of the display window (exclusive).
    pub scheduled_at: DateTime<FixedOffset>,
    /// End of the display window (exclusive).
    pub expires_at: DateTime<FixedOffset>,
}

impl Default for Banner {
    fn default() -> Self {
        Self {
            id: BannerId::UNSET,
            name: String::new(),
            created_at: unset_instant(),
            scheduled_at: unset_instant(),
            expires_at: unset_instant(),
        }
    }
}

impl Banner {
    /// Creates an unsaved banner with the given window.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        scheduled_at: DateTime<FixedOffset>,
        expires_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            name: name.into(),
            scheduled_at,
            expires_at,
            ..Self::default()
        }
    }

    /// True iff `now` is strictly after the scheduled instant and strictly
    /// before the expiration instant.
    ///
    /// A banner whose expiration is not after its scheduled instant is never
    /// in its display period.
    #[must_use]
    pub fn is_in_display_period<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let now = now.with_timezone(&Utc);
        now > self.scheduled_at.with_timezone(&Utc) && now < self.expires_at.with_timezone(&Utc)
    }

    /// True iff `now` is at or after the expiration instant.
    ///
    /// The boundary matches [`is_in_display_period`](Self::is_in_display_period):
    /// at the exact expiration instant a banner is expired and out of its window.
    #[must_use]
    pub fn is_expired<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.with_timezone(&Utc) >= self.expires_at.with_timezone(&Utc)
    }

    /// Expiration instant normalized to UTC. Used as the tie-break sort key.
    #[must_use]
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        self.expires_at.with_timezone(&Utc)
    }
}
