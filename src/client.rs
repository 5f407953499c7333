//! This module provides a client to connect to a Canvas-compatible LMS server

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::course::Course;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::event::Event;
use crate::record::ItemKind;
use crate::traits::{ItemSummary, LmsSource, Submission};

/// The upstream default page size is tiny; ask for the maximum instead
const PER_PAGE: &str = "100";

/// Placeholder for items the server serves without a display name
const NO_NAME: &str = "<no name>";

/// An LMS source that fetches its data from a real server.
///
/// It is a thin accessor: one HTTP request per operation, no retries, no backoff, every request
/// bounded by [`config::REQUEST_TIMEOUT`](crate::config::REQUEST_TIMEOUT).
pub struct Client {
    endpoint: Endpoint,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(base_url: S, access_token: T) -> Result<Self, Error> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| Error::Parse {
            context: format!("base URL {}", base_url.as_ref()),
            detail: err.to_string(),
        })?;
        Self::with_endpoint(Endpoint::new(url, access_token.to_string()))
    }

    /// Create a client against [`config::DEFAULT_BASE_URL`](crate::config::DEFAULT_BASE_URL)
    pub fn new_with_default_server<T: ToString>(access_token: T) -> Result<Self, Error> {
        let base = crate::config::DEFAULT_BASE_URL.lock().unwrap().clone();
        Self::new(base, access_token)
    }

    fn with_endpoint(endpoint: Endpoint) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(crate::config::request_timeout())
            .build()
            .map_err(|source| Error::Network {
                url: "<client setup>".to_string(),
                source,
            })?;
        Ok(Self { endpoint, http })
    }

    /// GET an API path and parse the JSON response.
    ///
    /// Errors are reported against `path`, not the full URL: the built URL carries the access
    /// token and must never end up in a log line.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.endpoint.api_url(path, extra_query);

        let response = self.http.get(url).send().await.map_err(|source| Error::Network {
            url: path.to_string(),
            source,
        })?;

        if response.status().is_success() == false {
            return Err(Error::Upstream {
                url: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| Error::Network {
            url: path.to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|err| Error::Parse {
            context: path.to_string(),
            detail: err.to_string(),
        })
    }
}

#[async_trait]
impl LmsSource for Client {
    async fn list_courses(&self) -> Result<Vec<Course>, Error> {
        let raw: Vec<RawCourse> = self
            .fetch_json(
                "/api/v1/courses",
                &[("enrollment_type", "student"), ("per_page", PER_PAGE)],
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|course| {
                let title = course.name.unwrap_or_else(|| NO_NAME.to_string());
                Course::new(course.id.to_string(), title)
            })
            .collect())
    }

    async fn list_assignments(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error> {
        let path = format!("/api/v1/courses/{}/assignments", course_id);
        let raw: Vec<RawAssignment> = self.fetch_json(&path, &[("per_page", PER_PAGE)]).await?;
        Ok(raw.into_iter().map(summary_from_assignment).collect())
    }

    async fn list_quizzes(&self, course_id: &str) -> Result<Vec<ItemSummary>, Error> {
        let path = format!("/api/v1/courses/{}/quizzes", course_id);
        let raw: Vec<RawQuiz> = self.fetch_json(&path, &[("per_page", PER_PAGE)]).await?;
        Ok(raw.into_iter().map(summary_from_quiz).collect())
    }

    async fn get_submission(
        &self,
        course_id: &str,
        item_id: u64,
        kind: ItemKind,
    ) -> Result<Submission, Error> {
        match kind {
            ItemKind::Assignment => {
                let path = format!(
                    "/api/v1/courses/{}/assignments/{}/submissions/self",
                    course_id, item_id
                );
                let raw: RawSubmission = self.fetch_json(&path, &[]).await?;
                Ok(submission_from_raw(raw, &path))
            }
            ItemKind::Quiz => {
                // Quiz submissions come back wrapped in an envelope, unlike assignment ones
                let path = format!(
                    "/api/v1/courses/{}/quizzes/{}/submissions/self",
                    course_id, item_id
                );
                let raw: RawQuizSubmissions = self.fetch_json(&path, &[]).await?;
                first_quiz_submission(raw, &path)
            }
        }
    }

    async fn list_calendar_events(&self) -> Result<Vec<Event>, Error> {
        let raw: Vec<RawCalendarEvent> = self
            .fetch_json("/api/v1/calendar_events", &[("per_page", PER_PAGE)])
            .await?;
        Ok(raw.into_iter().map(event_from_raw).collect())
    }
}

#[derive(Deserialize)]
struct RawCourse {
    id: u64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawAssignment {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    due_at: Option<String>,
    #[serde(default)]
    points_possible: Option<serde_json::Value>,
}

// Same resource shape as an assignment, except the display name field is `title`
#[derive(Deserialize)]
struct RawQuiz {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    due_at: Option<String>,
    #[serde(default)]
    points_possible: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawSubmission {
    #[serde(default)]
    score: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawQuizSubmissions {
    #[serde(default)]
    quiz_submissions: Vec<RawSubmission>,
}

#[derive(Deserialize)]
struct RawCalendarEvent {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start_at: Option<String>,
    #[serde(default)]
    blackout_date: Option<bool>,
}

/// Read a points field that the server may serve as a number, `null`, or garbage.
///
/// "No total" is a real state ("this item is ungraded practice") and must stay distinct from a
/// total of zero, so anything non-numeric becomes `None` rather than `0`.
fn numeric_points(value: Option<serde_json::Value>, what: &str) -> Option<f64> {
    match value {
        None => None,
        Some(serde_json::Value::Null) => None,
        Some(value) => match value.as_f64() {
            Some(points) => Some(points),
            None => {
                log::warn!(
                    "Non-numeric points value {:?} for {}. Treating it as absent.",
                    value,
                    what
                );
                None
            }
        },
    }
}

fn summary_from_assignment(raw: RawAssignment) -> ItemSummary {
    let name = raw.name.unwrap_or_else(|| NO_NAME.to_string());
    let points_possible = numeric_points(raw.points_possible, &name);
    ItemSummary {
        id: raw.id,
        name,
        due_at: raw.due_at,
        points_possible,
    }
}

fn summary_from_quiz(raw: RawQuiz) -> ItemSummary {
    let name = raw.title.unwrap_or_else(|| NO_NAME.to_string());
    let points_possible = numeric_points(raw.points_possible, &name);
    ItemSummary {
        id: raw.id,
        name,
        due_at: raw.due_at,
        points_possible,
    }
}

fn submission_from_raw(raw: RawSubmission, what: &str) -> Submission {
    Submission {
        score: numeric_points(raw.score, what),
    }
}

fn first_quiz_submission(raw: RawQuizSubmissions, path: &str) -> Result<Submission, Error> {
    match raw.quiz_submissions.into_iter().next() {
        None => Err(Error::MissingData {
            what: format!("quiz submission in {}", path),
        }),
        Some(first) => Ok(submission_from_raw(first, path)),
    }
}

fn event_from_raw(raw: RawCalendarEvent) -> Event {
    let title = raw.title.unwrap_or_else(|| NO_NAME.to_string());
    let starts_at = match raw.start_at {
        None => None,
        Some(text) => match crate::record::parse_timestamp(&text) {
            Ok(instant) => Some(instant),
            Err(err) => {
                log::warn!("Calendar event {} has an unparseable start date: {}", title, err);
                None
            }
        },
    };
    Event::new(title, starts_at, raw.blackout_date.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_with_all_fields() {
        let raw: RawAssignment = serde_json::from_str(
            r#"{"id": 41, "name": "Problem Set 1", "due_at": "2024-12-05T23:30:00-05:00", "points_possible": 100}"#,
        )
        .unwrap();
        let summary = summary_from_assignment(raw);
        assert_eq!(summary.id, 41);
        assert_eq!(summary.name, "Problem Set 1");
        assert_eq!(summary.due_at.as_deref(), Some("2024-12-05T23:30:00-05:00"));
        assert_eq!(summary.points_possible, Some(100.0));
    }

    #[test]
    fn non_numeric_points_become_absent_not_zero() {
        let raw: RawAssignment = serde_json::from_str(
            r#"{"id": 41, "name": "PS1", "points_possible": "ninety"}"#,
        )
        .unwrap();
        assert_eq!(summary_from_assignment(raw).points_possible, None);

        let raw: RawAssignment =
            serde_json::from_str(r#"{"id": 41, "name": "PS1", "points_possible": null}"#).unwrap();
        assert_eq!(summary_from_assignment(raw).points_possible, None);
    }

    #[test]
    fn nameless_items_get_a_placeholder() {
        let raw: RawAssignment = serde_json::from_str(r#"{"id": 41}"#).unwrap();
        assert_eq!(summary_from_assignment(raw).name, NO_NAME);
    }

    #[test]
    fn quizzes_use_the_title_field() {
        let raw: RawQuiz = serde_json::from_str(
            r#"{"id": 7, "title": "Week 14 Quiz", "points_possible": 25.5}"#,
        )
        .unwrap();
        let summary = summary_from_quiz(raw);
        assert_eq!(summary.name, "Week 14 Quiz");
        assert_eq!(summary.points_possible, Some(25.5));
    }

    #[test]
    fn ungraded_submission_has_no_score() {
        let raw: RawSubmission = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(submission_from_raw(raw, "test").score, None);

        let raw: RawSubmission = serde_json::from_str(r#"{"score": 87.0}"#).unwrap();
        assert_eq!(submission_from_raw(raw, "test").score, Some(87.0));
    }

    #[test]
    fn empty_quiz_submission_envelope_is_missing_data() {
        let raw: RawQuizSubmissions = serde_json::from_str(r#"{"quiz_submissions": []}"#).unwrap();
        assert!(matches!(
            first_quiz_submission(raw, "test"),
            Err(Error::MissingData { .. })
        ));

        let raw: RawQuizSubmissions =
            serde_json::from_str(r#"{"quiz_submissions": [{"score": 9}]}"#).unwrap();
        assert_eq!(first_quiz_submission(raw, "test").unwrap().score, Some(9.0));
    }

    #[test]
    fn blackout_flag_defaults_to_false() {
        let raw: RawCalendarEvent = serde_json::from_str(
            r#"{"title": "Finals Week", "start_at": "2024-12-16T08:00:00-05:00"}"#,
        )
        .unwrap();
        let event = event_from_raw(raw);
        assert_eq!(event.is_blackout(), false);
        assert!(event.starts_at().is_some());

        let raw: RawCalendarEvent =
            serde_json::from_str(r#"{"title": "Campus Closed", "blackout_date": true}"#).unwrap();
        assert!(event_from_raw(raw).is_blackout());
    }

    #[test]
    fn unparseable_event_start_is_dropped_not_fatal() {
        let raw: RawCalendarEvent = serde_json::from_str(
            r#"{"title": "Advising Day", "start_at": "sometime soon"}"#,
        )
        .unwrap();
        assert_eq!(event_from_raw(raw).starts_at(), None);
    }
}
