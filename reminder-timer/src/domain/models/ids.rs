use serde::{Deserialize, Serialize};
use std::fmt;

/// A reminder identifier from the external reminder store.
///
/// Opaque to this crate; uniqueness is guaranteed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ReminderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ReminderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ReminderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A calendar (reminder list) identifier from the external store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CalendarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CalendarId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
