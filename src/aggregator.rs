//! This module walks the whole LMS surface and produces the flat record sequence
//!
//! The upstream API has no batch endpoint: every course, every item listing and every single
//! submission is its own request. The aggregator's job is to orchestrate that fan-out while
//! keeping failures as small as possible: a dead submission becomes one unavailable score, a dead
//! listing becomes one empty category, and only a dead course enumeration kills the refresh.

use std::sync::Arc;

use crate::course::Course;
use crate::error::Error;
use crate::record::{ItemKind, Record, Score};
use crate::refresh_progress::{RefreshEvent, RefreshProgress};
use crate::traits::{ItemSummary, LmsSource};

/// How many submissions will be fetched concurrently for one course
#[cfg(not(test))]
const SUBMISSION_BATCH_SIZE: usize = 8;
/// How many submissions will be fetched concurrently for one course
#[cfg(test)]
const SUBMISSION_BATCH_SIZE: usize = 2;

/// Produces the full record sequence for all enrolled courses.
///
/// Everything below the course list is best-effort and additive: for a course with N assignments
/// and M quizzes that could be listed, exactly N+M records come out, no matter how many
/// submission fetches failed along the way.
pub struct GradeAggregator<S> {
    source: Arc<S>,
}

impl<S: LmsSource + Send + Sync + 'static> GradeAggregator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Fetch every graded item of every enrolled course.
    ///
    /// The only fatal failure is the course enumeration itself: there is no meaningful partial
    /// result without a course list.
    pub async fn collect_records(
        &self,
        progress: &mut RefreshProgress,
    ) -> Result<Vec<Record>, Error> {
        let courses = self.source.list_courses().await?;
        progress.debug(&format!("Enumerated {} enrolled courses", courses.len()));

        let mut records = Vec::new();
        for course in &courses {
            progress.feedback(RefreshEvent::InProgress {
                course: course.title().to_string(),
                details: "fetching graded items".to_string(),
            });
            records.extend(self.collect_course(course, progress).await);
        }
        Ok(records)
    }

    /// Fetch both item categories of one course, then every submission.
    /// Never fails: a failed listing is an empty category, a failed submission an unavailable score.
    async fn collect_course(&self, course: &Course, progress: &mut RefreshProgress) -> Vec<Record> {
        let (assignments, quizzes) = tokio::join!(
            self.source.list_assignments(course.id()),
            self.source.list_quizzes(course.id()),
        );
        let assignments = unwrap_category(assignments, course, ItemKind::Assignment, progress);
        let quizzes = unwrap_category(quizzes, course, ItemKind::Quiz, progress);

        let items: Vec<(ItemKind, ItemSummary)> = assignments
            .into_iter()
            .map(|item| (ItemKind::Assignment, item))
            .chain(quizzes.into_iter().map(|item| (ItemKind::Quiz, item)))
            .collect();

        let scores = self.fetch_scores(course, &items, progress).await;

        items
            .into_iter()
            .zip(scores)
            .map(|((kind, item), score)| {
                let due_at = match &item.due_at {
                    None => None,
                    Some(text) => match crate::record::parse_timestamp(text) {
                        Ok(instant) => Some(instant),
                        Err(err) => {
                            progress.warn(&format!(
                                "{} {:?} has an unparseable due date: {}. Keeping it off the calendar.",
                                kind, item.name, err
                            ));
                            None
                        }
                    },
                };
                Record::new(
                    course.title().to_string(),
                    kind,
                    item.name,
                    due_at,
                    item.points_possible,
                    score,
                )
            })
            .collect()
    }

    /// Fetch the submission score of every item, in bounded concurrent batches.
    ///
    /// The result has exactly one score per item, in item order. Each batched task returns its
    /// own result, so a failing or slow submission never cancels its siblings.
    async fn fetch_scores(
        &self,
        course: &Course,
        items: &[(ItemKind, ItemSummary)],
        progress: &mut RefreshProgress,
    ) -> Vec<Score> {
        let mut scores = vec![Score::Unavailable; items.len()];

        for (batch_index, batch) in items.chunks(SUBMISSION_BATCH_SIZE).enumerate() {
            let mut handles = Vec::new();
            for (offset, (kind, item)) in batch.iter().enumerate() {
                let source = Arc::clone(&self.source);
                let course_id = course.id().to_string();
                let kind = *kind;
                let item_id = item.id;
                let index = batch_index * SUBMISSION_BATCH_SIZE + offset;
                handles.push(tokio::spawn(async move {
                    (index, source.get_submission(&course_id, item_id, kind).await)
                }));
            }

            for handle in handles {
                match handle.await {
                    Err(err) => {
                        progress.error(&format!("A submission fetch task died: {}", err));
                    }
                    Ok((index, fetched)) => {
                        let (kind, item) = &items[index];
                        scores[index] = match fetched {
                            Ok(submission) => match submission.score {
                                Some(points) => Score::Available(points),
                                None => {
                                    progress.debug(&format!(
                                        "{} {:?} has no graded score yet",
                                        kind, item.name
                                    ));
                                    Score::Unavailable
                                }
                            },
                            Err(err) => {
                                progress.warn(&format!(
                                    "Unable to fetch the submission for {} {:?}: {}. Marking its score unavailable.",
                                    kind, item.name, err
                                ));
                                Score::Unavailable
                            }
                        };
                    }
                }
            }
        }

        scores
    }
}

/// Turn a failed category listing into an empty one, so the course's other category and the other
/// courses still go through
fn unwrap_category(
    fetched: Result<Vec<ItemSummary>, Error>,
    course: &Course,
    kind: ItemKind,
    progress: &mut RefreshProgress,
) -> Vec<ItemSummary> {
    match fetched {
        Ok(items) => items,
        Err(err) => {
            progress.warn(&format!(
                "Unable to list the {}s of course {}: {}. Skipping this category this time.",
                kind,
                course.title(),
                err
            ));
            Vec::new()
        }
    }
}
