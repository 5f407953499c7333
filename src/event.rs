//! Calendar events published by the LMS (class sessions, campus-wide dates...)

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An event from the upstream calendar feed.
///
/// Blackout entries are placeholders the institution uses to block out date ranges; they are not
/// real events and are filtered out of the "active events" view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    title: String,
    starts_at: Option<DateTime<FixedOffset>>,
    blackout: bool,
}

impl Event {
    pub fn new(title: String, starts_at: Option<DateTime<FixedOffset>>, blackout: bool) -> Self {
        Self { title, starts_at, blackout }
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> { self.starts_at }
    pub fn is_blackout(&self) -> bool { self.blackout }
}
