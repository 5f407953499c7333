//! This module ties the fetch pipeline together behind one explicitly-constructed facade
//!
//! A [`Planner`] owns an LMS source, runs the aggregation on demand, and keeps the one current
//! [`CalendarState`] snapshot. It is meant to be created once, injected into whatever serves or
//! renders the data, and passed around by reference: there is deliberately no process-wide
//! instance and no global mutable map behind it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use itertools::Itertools;

use crate::aggregator::GradeAggregator;
use crate::calendar::{CalendarIngestor, CalendarState};
use crate::course::Course;
use crate::error::Error;
use crate::event::Event;
use crate::progress::{self, PointTotals};
use crate::record::{KindFilter, Record};
use crate::refresh_progress::{FeedbackSender, RefreshEvent, RefreshProgress};
use crate::traits::LmsSource;

/// The answer of [`Planner::health_check`]
const HEALTH_CHECK_OK: &str = "Situation Normal";

/// Owns the current calendar snapshot and refreshes it from an LMS source.
///
/// Refreshes are explicit: nothing here runs on a timer. Consumers read through
/// [`snapshot`](Planner::snapshot) (or the convenience accessors below), which hand out the
/// current state as a whole: a reader concurrent with a refresh sees either the old or the new
/// complete state, never a half-populated one. Snapshots must not be retained across a refresh.
pub struct Planner<S> {
    source: Arc<S>,
    ingestor: CalendarIngestor,
    state: Mutex<Arc<CalendarState>>,
    /// Serial number of the most recently started refresh. A refresh only applies its result if
    /// it still carries the latest serial: a superseded refresh discards its work instead of
    /// clobbering a newer state.
    refresh_serial: AtomicU64,
}

impl<S: LmsSource + Send + Sync + 'static> Planner<S> {
    pub fn new(source: S, ingestor: CalendarIngestor) -> Self {
        Self {
            source: Arc::new(source),
            ingestor,
            state: Mutex::new(Arc::new(CalendarState::default())),
            refresh_serial: AtomicU64::new(0),
        }
    }

    /// Returns the underlying LMS source.
    ///
    /// Apart from tests, there are very few (if any) reasons to access it directly.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// A read handle on the current snapshot.
    ///
    /// Cheap to take; take a fresh one for every read rather than holding on to it.
    pub fn snapshot(&self) -> Arc<CalendarState> {
        self.state.lock().unwrap().clone()
    }

    /// Fetch everything anew and replace the current snapshot, and provide feedback to the user
    /// about the progress.
    ///
    /// See [`Self::refresh`]
    pub async fn refresh_with_feedback(&self, feedback_sender: FeedbackSender) -> Result<bool, Error> {
        let mut progress = RefreshProgress::new_with_feedback_channel(feedback_sender);
        self.run_refresh(&mut progress).await
    }

    /// Fetch everything anew and replace the current snapshot.
    ///
    /// The refresh is best-effort below the course list: failed listings and submissions are
    /// logged and represented as empty categories or unavailable scores. Only a failed course
    /// enumeration makes the whole refresh fail, in which case the previous snapshot stays in
    /// place.
    ///
    /// Returns whether the result was applied: a refresh that got superseded by a newer one while
    /// it was running discards its result and returns `Ok(false)`.
    pub async fn refresh(&self) -> Result<bool, Error> {
        let mut progress = RefreshProgress::new();
        self.run_refresh(&mut progress).await
    }

    async fn run_refresh(&self, progress: &mut RefreshProgress) -> Result<bool, Error> {
        let serial = self.refresh_serial.fetch_add(1, Ordering::SeqCst) + 1;
        progress.info("Starting a refresh.");
        progress.feedback(RefreshEvent::Started);

        let aggregator = GradeAggregator::new(Arc::clone(&self.source));
        let records = match aggregator.collect_records(progress).await {
            Err(err) => {
                progress.error(&format!("Refresh failed: unable to enumerate courses: {}", err));
                progress.feedback(RefreshEvent::Finished { success: false });
                return Err(err);
            }
            Ok(records) => records,
        };

        let new_state = self.ingestor.ingest(records);

        let applied = {
            let mut state = self.state.lock().unwrap();
            if self.refresh_serial.load(Ordering::SeqCst) != serial {
                progress.info("A newer refresh was started in the meantime. Discarding this result.");
                false
            } else {
                *state = Arc::new(new_state);
                true
            }
        };

        progress.info("Refresh ended");
        progress.feedback(RefreshEvent::Finished { success: progress.is_success() });
        Ok(applied)
    }

    /// The courses the student is currently enrolled in, straight from the source
    pub async fn courses(&self) -> Result<Vec<Course>, Error> {
        self.source.list_courses().await
    }

    /// Every record of the current snapshot, graded or not, dated or not
    pub fn grades(&self) -> Vec<Record> {
        self.snapshot().records().to_vec()
    }

    /// The current records grouped by course title
    pub fn course_grades(&self) -> HashMap<String, Vec<Record>> {
        self.snapshot()
            .records()
            .iter()
            .cloned()
            .into_group_map_by(|record| record.course().to_string())
    }

    /// The current records matching a kind filter
    pub fn records_matching(&self, filter: KindFilter) -> Vec<Record> {
        self.snapshot().records_matching(filter)
    }

    /// The assignment records only (quizzes excluded)
    pub fn assignments(&self) -> Vec<Record> {
        self.records_matching(KindFilter::ASSIGNMENT)
    }

    /// The upstream calendar events, with blackout placeholders filtered out
    pub async fn active_events(&self) -> Result<Vec<Event>, Error> {
        let events = self.source.list_calendar_events().await?;
        Ok(events
            .into_iter()
            .filter(|event| event.is_blackout() == false)
            .collect())
    }

    /// Point totals for one day of the current snapshot
    pub fn daily_totals(&self, date: NaiveDate) -> PointTotals {
        progress::daily_totals(&self.snapshot(), date)
    }

    /// Point totals for one month of the current snapshot
    pub fn monthly_totals(&self, year: i32, month: u32) -> PointTotals {
        progress::monthly_totals(&self.snapshot(), year, month)
    }

    /// A trivial liveness probe for the serving layer to expose
    pub fn health_check(&self) -> &'static str {
        HEALTH_CHECK_OK
    }
}
