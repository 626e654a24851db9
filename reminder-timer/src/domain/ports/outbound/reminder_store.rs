use async_trait::async_trait;

use crate::domain::{
    models::{Reminder, ReminderId},
    ReminderStoreError,
};

/// Outbound port for the external reminder store.
///
/// The store owns the reminder records. This crate only reads them and hands
/// back rewritten notes to save; it never edits a record in place.
#[async_trait]
pub trait ReminderStore: Send + Sync + 'static {
    /// Ask for full access to reminders. `Ok(false)` means the user declined.
    async fn request_access(&self) -> Result<bool, ReminderStoreError>;

    /// Fetch every reminder, completed ones included.
    async fn fetch_reminders(&self) -> Result<Vec<Reminder>, ReminderStoreError>;

    /// Fetch the current state of a single reminder.
    async fn fetch_reminder(&self, id: &ReminderId)
        -> Result<Option<Reminder>, ReminderStoreError>;

    /// Replace the notes of a reminder and commit.
    async fn save_notes(&self, id: &ReminderId, notes: &str) -> Result<(), ReminderStoreError>;
}
