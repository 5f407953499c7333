//! An in-memory LMS, used to run the integration suites without a live server
#![cfg(feature = "mock_lms")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::course::{Course, CourseId};
use crate::error::Error;
use crate::event::Event;
use crate::mock_behaviour::MockBehaviour;
use crate::record::ItemKind;
use crate::traits::{ItemSummary, LmsSource, Submission};

/// An LMS source whose entire population lives in memory.
///
/// Tests build one up with the `add_*`/`set_*` methods, optionally attach a [`MockBehaviour`] to
/// script failures, and hand it to the aggregator or a planner in place of a real
/// [`Client`](crate::client::Client).
#[derive(Default)]
pub struct MockLms {
    courses: Vec<Course>,
    assignments: HashMap<CourseId, Vec<ItemSummary>>,
    quizzes: HashMap<CourseId, Vec<ItemSummary>>,
    submissions: HashMap<(CourseId, ItemKind, u64), Submission>,
    events: Vec<Event>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockLms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_behaviour(behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self { behaviour, ..Self::default() }
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    pub fn add_assignment(&mut self, course_id: &str, item: ItemSummary) {
        self.assignments.entry(course_id.to_string()).or_insert_with(Vec::new).push(item);
    }

    pub fn add_quiz(&mut self, course_id: &str, item: ItemSummary) {
        self.quizzes.entry(course_id.to_string()).or_insert_with(Vec::new).push(item);
    }

    /// Record the student's submission for one item. Items without a recorded submission answer
    /// with a missing-data error, like the real server does for never-submitted items.
    pub fn set_submission(&mut self, course_id: &str, kind: ItemKind, item_id: u64, submission: Submission) {
        self.submissions.insert((course_id.to_string(), kind, item_id), submission);
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[async_trait]
impl LmsSource for MockLms {
    async fn list_courses(&self) -> Result<Vec<Course>, Error> {
        self.behaviour.lock().unwrap().can_list_courses()?;
        Ok(self.courses.clone())
    }

    async fn list_assignments(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error> {
        self.behaviour.lock().unwrap().can_list_assignments()?;
        Ok(self.assignments.get(course_id).cloned().unwrap_or_default())
    }

    async fn list_quizzes(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error> {
        self.behaviour.lock().unwrap().can_list_quizzes()?;
        Ok(self.quizzes.get(course_id).cloned().unwrap_or_default())
    }

    async fn get_submission(
        &self,
        course_id: &str,
        item_id: u64,
        kind: ItemKind,
    ) -> Result<Submission, Error> {
        self.behaviour.lock().unwrap().can_get_submission()?;
        match self.submissions.get(&(course_id.to_string(), kind, item_id)) {
            None => Err(Error::MissingData {
                what: format!("submission for {} {} in course {}", kind, item_id, course_id),
            }),
            Some(submission) => Ok(submission.clone()),
        }
    }

    async fn list_calendar_events(&self) -> Result<Vec<Event>, Error> {
        self.behaviour.lock().unwrap().can_list_calendar_events()?;
        Ok(self.events.clone())
    }
}
