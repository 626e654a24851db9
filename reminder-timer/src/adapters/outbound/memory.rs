//! In-memory reminder store, for embedding hosts without a native store and
//! for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::{
    models::{Reminder, ReminderId},
    ports::outbound::ReminderStore,
    ReminderStoreError,
};

/// Reminder store backed by an in-memory HashMap.
///
/// Clones share the same data.
///
/// # Examples
///
/// ```
/// use reminder_timer::adapters::outbound::InMemoryReminderStore;
/// use reminder_timer::domain::models::Reminder;
///
/// let store = InMemoryReminderStore::new()
///     .with_reminders(vec![Reminder::new("r1").with_title("Report")]);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryReminderStore {
    reminders: Arc<RwLock<HashMap<ReminderId, Reminder>>>,
    access_denied: Arc<AtomicBool>,
    /// Number of upcoming saves that fail.
    failing_saves: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add initial reminders to the store.
    pub fn with_reminders(self, reminders: Vec<Reminder>) -> Self {
        {
            let mut map = self.write();
            for reminder in reminders {
                map.insert(reminder.id.clone(), reminder);
            }
        }
        self
    }

    /// Make `request_access` report a declined request.
    pub fn deny_access(self) -> Self {
        self.access_denied.store(true, Ordering::SeqCst);
        self
    }

    /// Make the next `count` saves fail.
    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }

    pub fn insert(&self, reminder: Reminder) {
        self.write().insert(reminder.id.clone(), reminder);
    }

    /// Current notes of a reminder.
    pub fn notes(&self, id: &ReminderId) -> Option<String> {
        self.read().get(id).and_then(|r| r.notes.clone())
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ReminderId, Reminder>> {
        self.reminders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ReminderId, Reminder>> {
        self.reminders.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_access(&self) -> Result<(), ReminderStoreError> {
        if self.access_denied.load(Ordering::SeqCst) {
            return Err(ReminderStoreError::AccessDenied);
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn request_access(&self) -> Result<bool, ReminderStoreError> {
        Ok(!self.access_denied.load(Ordering::SeqCst))
    }

    async fn fetch_reminders(&self) -> Result<Vec<Reminder>, ReminderStoreError> {
        self.check_access()?;
        Ok(self.read().values().cloned().collect())
    }

    async fn fetch_reminder(
        &self,
        id: &ReminderId,
    ) -> Result<Option<Reminder>, ReminderStoreError> {
        self.check_access()?;
        Ok(self.read().get(id).cloned())
    }

    async fn save_notes(&self, id: &ReminderId, notes: &str) -> Result<(), ReminderStoreError> {
        self.check_access()?;

        let should_fail = self
            .failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ReminderStoreError::save_failed("injected save failure"));
        }

        let mut reminders = self.write();
        let reminder = reminders
            .get_mut(id)
            .ok_or_else(|| ReminderStoreError::NotFound(id.clone()))?;
        reminder.notes = Some(notes.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
