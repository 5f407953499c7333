use async_trait::async_trait;

use crate::course::Course;
use crate::error::Error;
use crate::event::Event;
use crate::record::ItemKind;

/// A summary of one gradable item, as returned by the assignment and quiz listing endpoints.
///
/// The student's submission (and thus the earned score) lives on a separate resource and is
/// fetched item by item afterwards. `due_at` is kept as the raw timestamp string here: whether an
/// unparseable date is an error or merely "no calendar placement" is the aggregator's call, not
/// the transport's.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSummary {
    pub id: u64,
    pub name: String,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
}

/// The student's own submission for one gradable item
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submission {
    /// The graded score, if the submission has been graded at all
    pub score: Option<f64>,
}

/// Something that can answer the LMS queries the aggregation pipeline needs.
///
/// This is usually a [`Client`](crate::client::Client) talking to the real server, but tests can
/// substitute an in-memory [`MockLms`](crate::mock_lms::MockLms) to exercise the pipeline without
/// a network.
#[async_trait]
pub trait LmsSource {
    /// List the courses the student is enrolled in.
    /// This is the one fetch the pipeline cannot do without: when it fails, the whole refresh fails.
    async fn list_courses(&self) -> Result<Vec<Course>, Error>;

    /// List the assignments of one course
    async fn list_assignments(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error>;

    /// List the quizzes of one course
    async fn list_quizzes(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error>;

    /// Fetch the student's submission for one item
    async fn get_submission(
        &self,
        course_id: &str,
        item_id: u64,
        kind: ItemKind,
    ) -> Result<Submission, Error>;

    /// List the events of the upstream calendar feed (blackout entries included)
    async fn list_calendar_events(&self) -> Result<Vec<Event>, Error>;
}
