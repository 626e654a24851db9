use itertools::Itertools;
use tracing::{info, warn};

use crate::domain::{
    models::{Reminder, ReminderCalendar, ReminderId},
    ports::outbound::ReminderStore,
    ReminderTimerError,
};

/// The open reminders of the store, sorted by title, plus the calendars they
/// belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderBoard {
    reminders: Vec<Reminder>,
    calendars: Vec<ReminderCalendar>,
}

impl ReminderBoard {
    /// Build a board from everything the store returned. Completed reminders
    /// are dropped; a missing title sorts as an empty one.
    pub fn from_reminders(all: Vec<Reminder>) -> Self {
        let reminders: Vec<Reminder> = all
            .into_iter()
            .filter(|r| !r.completed)
            .sorted_by(|a, b| title_key(a).cmp(title_key(b)))
            .collect();

        let calendars = reminders
            .iter()
            .filter_map(|r| r.calendar.clone())
            .unique_by(|c| c.id.clone())
            .sorted_by(|a, b| a.title.cmp(&b.title))
            .collect();

        Self {
            reminders,
            calendars,
        }
    }

    /// Request access and load the open reminders from `store`.
    pub async fn load<S: ReminderStore + ?Sized>(store: &S) -> Result<Self, ReminderTimerError> {
        if !store.request_access().await? {
            warn!("Access to reminders was not granted");
            return Err(ReminderTimerError::AccessDenied);
        }

        let board = Self::from_reminders(store.fetch_reminders().await?);
        info!(
            open = board.reminders.len(),
            calendars = board.calendars.len(),
            "Reminders loaded"
        );
        Ok(board)
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn calendars(&self) -> &[ReminderCalendar] {
        &self.calendars
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn find(&self, id: &ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|r| &r.id == id)
    }

    /// Reminders whose title contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&Reminder> {
        if query.is_empty() {
            return self.reminders.iter().collect();
        }

        let needle = query.to_lowercase();
        self.reminders
            .iter()
            .filter(|r| title_key(r).to_lowercase().contains(&needle))
            .collect()
    }

    /// Keep the snapshot in line with notes that were just saved.
    pub fn update_notes(&mut self, id: &ReminderId, notes: impl Into<String>) -> bool {
        match self.reminders.iter_mut().find(|r| &r.id == id) {
            Some(reminder) => {
                reminder.notes = Some(notes.into());
                true
            }
            None => false,
        }
    }
}

fn title_key(reminder: &Reminder) -> &str {
    reminder.title.as_deref().unwrap_or("")
}
