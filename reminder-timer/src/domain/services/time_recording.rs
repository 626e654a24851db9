use std::{sync::Arc, time::Duration};

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

use crate::domain::{
    clock::{Clock, SystemClock},
    models::ReminderId,
    ports::outbound::ReminderStore,
    time_spent::{add_time_spent, parse_time_spent, TimeSpent},
    timer_registry::{lock_registry, ElapsedSnapshot, SharedTimerRegistry},
    ReminderTimerError, TimerRegistry,
};

/// Outcome of persisting a timing interval.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTime {
    pub reminder_id: ReminderId,
    pub elapsed: Duration,
    /// Total now stored in the notes.
    pub total: TimeSpent,
    /// The notes as saved.
    pub notes: String,
}

/// Drives timers and writes their elapsed time into reminder notes.
///
/// Every read-modify-write of notes goes through one lock, so two stops never
/// interleave their saves. Edits made to the same notes outside this service
/// are last-write-wins.
pub struct TimeRecordingService<S, C = SystemClock> {
    store: Arc<S>,
    registry: SharedTimerRegistry<C>,
    save_lock: Mutex<()>,
}

impl<S: ReminderStore> TimeRecordingService<S, SystemClock> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_registry(store, TimerRegistry::new().into_shared())
    }
}

impl<S: ReminderStore, C: Clock> TimeRecordingService<S, C> {
    pub fn with_registry(store: Arc<S>, registry: SharedTimerRegistry<C>) -> Self {
        Self {
            store,
            registry,
            save_lock: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &SharedTimerRegistry<C> {
        &self.registry
    }

    pub fn start(&self, id: &ReminderId) {
        lock_registry(&self.registry).start(id);
    }

    pub fn is_running(&self, id: &ReminderId) -> bool {
        lock_registry(&self.registry).is_running(id)
    }

    pub fn display_elapsed(&self, id: &ReminderId) -> Duration {
        lock_registry(&self.registry).display_elapsed(id)
    }

    pub fn subscribe(&self) -> watch::Receiver<ElapsedSnapshot> {
        lock_registry(&self.registry).subscribe()
    }

    /// Stop the timer of `id` and add the elapsed time to its notes.
    ///
    /// Returns `Ok(None)` without touching the store when the timer was not
    /// running. On a save failure the timer stays stopped and the error
    /// carries the elapsed time for [`record`](Self::record).
    pub async fn stop_and_record(
        &self,
        id: &ReminderId,
    ) -> Result<Option<RecordedTime>, ReminderTimerError> {
        let elapsed = {
            let mut registry = lock_registry(&self.registry);
            if !registry.is_running(id) {
                debug!(reminder_id = %id, "Nothing to record, timer not running");
                return Ok(None);
            }
            registry.stop(id)
        };

        self.record(id, elapsed).await.map(Some)
    }

    /// Add `elapsed` to the notes of `id` and save them.
    ///
    /// The notes are re-read from the store first so edits made since the
    /// reminders were loaded survive.
    pub async fn record(
        &self,
        id: &ReminderId,
        elapsed: Duration,
    ) -> Result<RecordedTime, ReminderTimerError> {
        let _guard = self.save_lock.lock().await;

        let save_failed = |source| ReminderTimerError::SaveFailed {
            id: id.clone(),
            elapsed,
            source,
        };

        let reminder = match self.store.fetch_reminder(id).await {
            Ok(Some(reminder)) => reminder,
            Ok(None) => return Err(ReminderTimerError::ReminderNotFound(id.clone())),
            Err(e) => {
                error!(reminder_id = %id, error = %e, "Failed to read reminder before saving time");
                return Err(save_failed(e));
            }
        };

        let notes = add_time_spent(reminder.notes.as_deref().unwrap_or(""), elapsed);

        if let Err(e) = self.store.save_notes(id, &notes).await {
            error!(
                reminder_id = %id,
                error = %e,
                elapsed_secs = elapsed.as_secs(),
                "Failed to save tracked time"
            );
            return Err(save_failed(e));
        }

        let total = parse_time_spent(&notes).unwrap_or_default();
        info!(
            reminder_id = %id,
            elapsed_secs = elapsed.as_secs(),
            total = %total,
            "Tracked time saved"
        );

        Ok(RecordedTime {
            reminder_id: id.clone(),
            elapsed,
            total,
            notes,
        })
    }
}
