//! Reading and rewriting the `time_spent:` annotation embedded in reminder
//! notes.
//!
//! The annotation looks like `time_spent: 1h 30m 0s` and may sit anywhere in
//! free text. Parsing is permissive (each unit is located on its own), while
//! rewriting always emits the canonical three-component form at the original
//! position.

mod format;
mod scanner;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use format::{format_clock, format_compact};

/// Literal tag that anchors the annotation. Case-sensitive.
pub const TIME_SPENT_TAG: &str = "time_spent:";

/// Label shown for a reminder without tracked time.
pub const UNTRACKED_LABEL: &str = "Untracked";

/// Hours, minutes and seconds as read from (or written to) an annotation.
///
/// Parsed values are kept as written, so `minutes` may exceed 59 until the
/// next write renormalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSpent {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeSpent {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Canonical split of a second count, with minutes and seconds in `0..60`.
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds())
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    pub fn normalized(&self) -> Self {
        Self::from_seconds(self.total_seconds())
    }

    /// Compact display form, e.g. `"2h 5s"`.
    pub fn compact(&self) -> String {
        format_compact(self.hours, self.minutes, self.seconds)
    }
}

/// Persisted form: `"{h}h {m}m {s}s"`.
impl fmt::Display for TimeSpent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

impl From<Duration> for TimeSpent {
    fn from(duration: Duration) -> Self {
        Self::from_seconds(round_to_seconds(duration))
    }
}

/// Round to the nearest whole second, halves rounding up.
pub fn round_to_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() >= 500_000_000 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

/// Read the annotation from `notes`.
///
/// Returns `None` when the tag is absent, and also when the tag is present but
/// every component reads as zero: an all-zero annotation counts as "no tracked
/// time", not as "zero time tracked".
///
/// # Examples
///
/// ```
/// use reminder_timer::domain::time_spent::{parse_time_spent, TimeSpent};
///
/// let parsed = parse_time_spent("Call back\ntime_spent: 1h 5m 0s");
/// assert_eq!(parsed, Some(TimeSpent::new(1, 5, 0)));
///
/// assert_eq!(parse_time_spent("time_spent: 0h 0m 0s"), None);
/// assert_eq!(parse_time_spent("no annotation"), None);
/// ```
pub fn parse_time_spent(notes: &str) -> Option<TimeSpent> {
    let tag_start = notes.find(TIME_SPENT_TAG)?;
    let after_tag = &notes[tag_start + TIME_SPENT_TAG.len()..];

    let parsed = TimeSpent {
        hours: scanner::find_unit(after_tag, 'h').unwrap_or(0),
        minutes: scanner::find_unit(after_tag, 'm').unwrap_or(0),
        seconds: scanner::find_unit(after_tag, 's').unwrap_or(0),
    };

    if parsed.is_zero() {
        return None;
    }

    Some(parsed)
}

/// Return `notes` with `elapsed` added to its annotation.
///
/// `elapsed` is rounded to whole seconds and added to the existing total. An
/// existing annotation is replaced in place (the first canonical one, or else
/// the one at the first tag); everything around it is left untouched.
/// Without an annotation a new line is appended.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use reminder_timer::domain::time_spent::add_time_spent;
///
/// let notes = add_time_spent("Some note", Duration::from_secs(125));
/// assert_eq!(notes, "Some note\ntime_spent: 0h 2m 5s");
///
/// let notes = add_time_spent(&notes, Duration::from_secs(3600));
/// assert_eq!(notes, "Some note\ntime_spent: 1h 2m 5s");
/// ```
pub fn add_time_spent(notes: &str, elapsed: Duration) -> String {
    let existing = parse_time_spent(notes)
        .map(|spent| spent.total_seconds())
        .unwrap_or(0);
    let combined = TimeSpent::from_seconds(existing.saturating_add(round_to_seconds(elapsed)));
    let annotation = format!("{TIME_SPENT_TAG} {combined}");

    let Some(tag_start) = notes.find(TIME_SPENT_TAG) else {
        if notes.is_empty() {
            return annotation;
        }
        return format!("{notes}\n{annotation}");
    };

    let span = scanner::canonical_span(notes)
        .unwrap_or_else(|| scanner::loose_span(notes, tag_start));

    let mut updated = String::with_capacity(notes.len() - span.len() + annotation.len());
    updated.push_str(&notes[..span.start]);
    updated.push_str(&annotation);
    updated.push_str(&notes[span.end..]);
    updated
}

/// Compact tracked time for display, or [`UNTRACKED_LABEL`].
pub fn pretty_time_spent(notes: Option<&str>) -> String {
    notes
        .and_then(parse_time_spent)
        .map(|spent| spent.compact())
        .unwrap_or_else(|| UNTRACKED_LABEL.to_string())
}
