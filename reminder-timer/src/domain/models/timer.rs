use std::time::Duration;

use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Stopped,
    Running,
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerStatus::Stopped => write!(f, "Stopped"),
            TimerStatus::Running => write!(f, "Running"),
        }
    }
}

/// Timer state for a single reminder.
///
/// `last_elapsed` holds the last stopped or last ticked value and survives a
/// stop until the next start overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    started_at: Option<OffsetDateTime>,
    last_elapsed: Duration,
}

impl TimerState {
    pub fn running_since(started_at: OffsetDateTime) -> Self {
        Self {
            started_at: Some(started_at),
            last_elapsed: Duration::ZERO,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.started_at.is_some() {
            TimerStatus::Running
        } else {
            TimerStatus::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    pub fn last_elapsed(&self) -> Duration {
        self.last_elapsed
    }

    /// Elapsed time of the running interval at `now`, or `None` when stopped.
    pub fn elapsed_at(&self, now: OffsetDateTime) -> Option<Elapsed> {
        self.started_at.map(|start| Elapsed::between(start, now))
    }

    pub(crate) fn start(&mut self, now: OffsetDateTime) {
        *self = Self::running_since(now);
    }

    pub(crate) fn stop(&mut self, now: OffsetDateTime) -> Option<Elapsed> {
        let elapsed = self.elapsed_at(now)?;
        self.started_at = None;
        self.last_elapsed = elapsed.duration;
        Some(elapsed)
    }

    pub(crate) fn refresh(&mut self, now: OffsetDateTime) -> Option<Elapsed> {
        let elapsed = self.elapsed_at(now)?;
        self.last_elapsed = elapsed.duration;
        Some(elapsed)
    }
}

/// A non-negative elapsed duration, remembering whether it had to be clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub duration: Duration,
    /// The wall clock went backwards and the raw difference was negative.
    pub clamped: bool,
}

impl Elapsed {
    pub fn between(start: OffsetDateTime, now: OffsetDateTime) -> Self {
        match Duration::try_from(now - start) {
            Ok(duration) => Self {
                duration,
                clamped: false,
            },
            Err(_) => Self {
                duration: Duration::ZERO,
                clamped: true,
            },
        }
    }
}
