use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{CalendarId, ReminderId};
use crate::domain::time_spent::{self, TimeSpent};

/// Title shown for reminders without one.
pub const UNTITLED: &str = "Untitled";

/// A reminder list in the external store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderCalendar {
    pub id: CalendarId,
    pub title: String,
}

impl ReminderCalendar {
    pub fn new(id: impl Into<CalendarId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Snapshot of a reminder record from the external store.
///
/// `notes` is the free-text field that carries the `time_spent:` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub completed: bool,
    pub calendar: Option<ReminderCalendar>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due: Option<OffsetDateTime>,
}

impl Reminder {
    pub fn new(id: impl Into<ReminderId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            notes: None,
            completed: false,
            calendar: None,
            due: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_calendar(mut self, calendar: ReminderCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_due(mut self, due: OffsetDateTime) -> Self {
        self.due = Some(due);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Tracked time recorded in the notes, if any.
    pub fn time_spent(&self) -> Option<TimeSpent> {
        self.notes.as_deref().and_then(time_spent::parse_time_spent)
    }

    /// Tracked time for display, e.g. `"1h 5m"` or `"Untracked"`.
    pub fn pretty_time_spent(&self) -> String {
        time_spent::pretty_time_spent(self.notes.as_deref())
    }
}
