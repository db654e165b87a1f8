//! TTL Module
//!
//! TTL arguments accepted by `set` and the expiry rule applied to stored envelopes.

use chrono::{DateTime, Months, TimeDelta, Utc};

use crate::error::{CacheError, Result};

// == TTL Argument ==
/// Time-to-live passed to `set`.
///
/// Whatever the variant, it is resolved once, at write time, into a whole number
/// of seconds. A stored TTL of `0` means the entry never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// No expiry
    #[default]
    Never,
    /// Seconds from now, `0` meaning no expiry
    Seconds(u64),
    /// A fixed span added to the current instant
    Duration(TimeDelta),
    /// Calendar months added to the current instant
    Months(u32),
}

impl Ttl {
    // == Resolve ==
    /// Resolves the TTL into seconds elapsed from `now`.
    ///
    /// Durations and calendar months are added to `now` and the span up to that
    /// target is kept, rounded up to whole seconds, so "1 month" written on January
    /// 31st lasts until the end of February and is never re-evaluated afterwards.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<u64> {
        let target = match *self {
            Ttl::Never => return Ok(0),
            Ttl::Seconds(secs) => return Ok(secs),
            Ttl::Duration(delta) => now.checked_add_signed(delta),
            Ttl::Months(months) => now.checked_add_months(Months::new(months)),
        }
        .ok_or_else(|| CacheError::InvalidArgument(format!("TTL {:?} is out of range", self)))?;

        let span = target.signed_duration_since(now);
        if span < TimeDelta::zero() {
            return Err(CacheError::InvalidArgument(format!(
                "TTL {:?} must not be negative",
                self
            )));
        }

        // Partial seconds round up so a short positive span never becomes the 0 sentinel
        let secs = span.num_seconds() + i64::from(span.subsec_nanos() > 0);
        u64::try_from(secs).map_err(|_| {
            CacheError::InvalidArgument(format!("TTL {:?} is out of range", self))
        })
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<Option<u64>> for Ttl {
    fn from(secs: Option<u64>) -> Self {
        secs.map_or(Ttl::Never, Ttl::Seconds)
    }
}

impl From<TimeDelta> for Ttl {
    fn from(delta: TimeDelta) -> Self {
        Ttl::Duration(delta)
    }
}

impl From<std::time::Duration> for Ttl {
    /// Spans too large for chrono saturate and are rejected at resolve time.
    fn from(duration: std::time::Duration) -> Self {
        Ttl::Duration(TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX))
    }
}

// == Expiry Rule ==
/// Returns true when an entry written at `created_at` with `ttl` seconds is
/// expired at `now` (all Unix seconds).
pub fn is_expired(ttl: u64, created_at: i64, now: i64) -> bool {
    if ttl == 0 {
        return false;
    }
    let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
    now.saturating_sub(created_at) >= ttl
}
