//! Courses the student is enrolled in

use serde::{Deserialize, Serialize};

/// The upstream identifier of a course. The API serves it as a number, but nothing in this crate
/// ever does arithmetic on it, so it is carried around as an opaque string.
pub type CourseId = String;

/// One course the student is enrolled in.
///
/// Courses are listed once per aggregation pass and are never mutated: a later refresh fetches a
/// brand new list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
}

impl Course {
    pub fn new(id: CourseId, title: String) -> Self {
        Self { id, title }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn title(&self) -> &str { &self.title }
}
