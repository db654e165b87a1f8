//! Clock Module
//!
//! Time source injected into the cache engine so expiry can be driven
//! deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

// == Clock Trait ==
/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

// == System Clock ==
/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to. Second resolution.
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at the given Unix timestamp.
    pub fn at_timestamp(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.secs.store(instant.timestamp(), Ordering::SeqCst);
    }

    /// Moves the clock forward (or backward, for negative values) by `secs`.
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::at_timestamp(1_000);
        assert_eq!(clock.now().timestamp(), 1_000);

        clock.advance(59);
        assert_eq!(clock.now().timestamp(), 1_059);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::at_timestamp(0);
        let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        clock.set(instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn test_system_clock_is_recent() {
        let before = Utc::now().timestamp();
        let now = SystemClock.now().timestamp();
        assert!(now >= before);
    }
}
