//! Time tracking for reminders.
//!
//! Timers run in memory per reminder. Stopping one adds the elapsed time to
//! a `time_spent: <H>h <M>m <S>s` annotation kept in the reminder's notes,
//! so the total survives in whatever store holds the reminders.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod session;
pub mod telemetry;

pub use domain::time_spent::{add_time_spent, parse_time_spent, pretty_time_spent, TimeSpent};
pub use domain::{ReminderStoreError, ReminderTimerError, TimerRegistry};
pub use session::TimerSession;
