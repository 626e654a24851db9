use std::time::Duration;

use thiserror::Error;

use super::models::ReminderId;

/// Errors reported by a reminder store.
#[derive(Debug, Error)]
pub enum ReminderStoreError {
    #[error("access to reminders denied")]
    AccessDenied,
    #[error("reminder not found: {0}")]
    NotFound(ReminderId),
    #[error("failed to save reminder: {0}")]
    SaveFailed(String),
    #[error("{0}")]
    Unknown(String),
}

impl ReminderStoreError {
    pub fn save_failed(msg: impl Into<String>) -> Self {
        Self::SaveFailed(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}

/// Errors that can occur while loading reminders or recording time.
#[derive(Debug, Error)]
pub enum ReminderTimerError {
    #[error("access to reminders was not granted")]
    AccessDenied,
    #[error("reminder not found: {0}")]
    ReminderNotFound(ReminderId),
    /// Persisting the notes failed. `elapsed` is the time that still has to be
    /// recorded; pass it to a retry.
    #[error("failed to save time for reminder {id}: {source}")]
    SaveFailed {
        id: ReminderId,
        elapsed: Duration,
        #[source]
        source: ReminderStoreError,
    },
    #[error(transparent)]
    Store(#[from] ReminderStoreError),
}

impl ReminderTimerError {
    /// Time that was measured but not persisted, if this is a save failure.
    pub fn unsaved_elapsed(&self) -> Option<Duration> {
        match self {
            Self::SaveFailed { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }
}
