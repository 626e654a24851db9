use time::OffsetDateTime;

/// Source of the current wall-clock time.
///
/// Wall-clock (not monotonic) time is used so running timers stay accurate
/// across system sleep.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
