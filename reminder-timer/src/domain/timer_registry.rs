//! Per-reminder timers: start, stop and a periodically refreshed display value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::models::{ReminderId, TimerState};

/// Display elapsed value of every running timer.
pub type ElapsedSnapshot = HashMap<ReminderId, Duration>;

/// Registry shared between the ticker and whoever handles start/stop.
pub type SharedTimerRegistry<C = SystemClock> = Arc<Mutex<TimerRegistry<C>>>;

/// Lock a shared registry. A panic while holding the lock leaves the timer
/// map consistent, so poisoning is ignored.
pub fn lock_registry<C>(registry: &Mutex<TimerRegistry<C>>) -> MutexGuard<'_, TimerRegistry<C>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the timer state of every reminder timed in this session.
///
/// Reminders that were never started are simply absent and read as "not
/// running" with zero elapsed time. Every start, stop and tick publishes the
/// running timers to subscribers (see [`TimerRegistry::subscribe`]).
pub struct TimerRegistry<C = SystemClock> {
    clock: C,
    timers: HashMap<ReminderId, TimerState>,
    running_tx: watch::Sender<ElapsedSnapshot>,
}

impl TimerRegistry<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        let (running_tx, _) = watch::channel(ElapsedSnapshot::new());
        Self {
            clock,
            timers: HashMap::new(),
            running_tx,
        }
    }

    pub fn into_shared(self) -> SharedTimerRegistry<C> {
        Arc::new(Mutex::new(self))
    }

    /// Start timing `id`. A timer that is already running restarts from now.
    pub fn start(&mut self, id: &ReminderId) {
        let now = self.clock.now();
        self.start_at(id, now);
    }

    pub fn start_at(&mut self, id: &ReminderId, now: OffsetDateTime) {
        let state = self.timers.entry(id.clone()).or_default();
        let restarted = state.is_running();
        state.start(now);

        info!(reminder_id = %id, restarted, "Timer started");
        self.publish();
    }

    /// Stop timing `id` and return the elapsed time.
    ///
    /// Returns zero, and changes nothing, when `id` is not running. A clock
    /// that went backwards yields zero as well.
    pub fn stop(&mut self, id: &ReminderId) -> Duration {
        let now = self.clock.now();
        self.stop_at(id, now)
    }

    pub fn stop_at(&mut self, id: &ReminderId, now: OffsetDateTime) -> Duration {
        let Some(elapsed) = self.timers.get_mut(id).and_then(|state| state.stop(now)) else {
            debug!(reminder_id = %id, "Stop ignored, timer not running");
            return Duration::ZERO;
        };

        if elapsed.clamped {
            warn!(reminder_id = %id, "Clock moved backwards, elapsed time clamped to zero");
        }
        info!(
            reminder_id = %id,
            elapsed_secs = elapsed.duration.as_secs(),
            "Timer stopped"
        );

        self.publish();
        elapsed.duration
    }

    /// Refresh the display value of every running timer.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.tick_at(now);
    }

    pub fn tick_at(&mut self, now: OffsetDateTime) {
        let mut refreshed = 0usize;
        for state in self.timers.values_mut() {
            if state.refresh(now).is_some() {
                refreshed += 1;
            }
        }

        if refreshed > 0 {
            self.publish();
        }
    }

    pub fn is_running(&self, id: &ReminderId) -> bool {
        self.timers.get(id).is_some_and(TimerState::is_running)
    }

    /// Last ticked value while running, last stopped value afterwards, zero
    /// for a reminder never started.
    pub fn display_elapsed(&self, id: &ReminderId) -> Duration {
        self.timers
            .get(id)
            .map(TimerState::last_elapsed)
            .unwrap_or_default()
    }

    pub fn state(&self, id: &ReminderId) -> Option<TimerState> {
        self.timers.get(id).copied()
    }

    pub fn running_ids(&self) -> impl Iterator<Item = &ReminderId> {
        self.timers
            .iter()
            .filter(|(_, state)| state.is_running())
            .map(|(id, _)| id)
    }

    pub fn running_count(&self) -> usize {
        self.running_ids().count()
    }

    /// Receive the running timers' display values after every change.
    pub fn subscribe(&self) -> watch::Receiver<ElapsedSnapshot> {
        self.running_tx.subscribe()
    }

    fn publish(&self) {
        let snapshot: ElapsedSnapshot = self
            .timers
            .iter()
            .filter(|(_, state)| state.is_running())
            .map(|(id, state)| (id.clone(), state.last_elapsed()))
            .collect();
        self.running_tx.send_replace(snapshot);
    }
}
