//! Date-bucketed views of the aggregated records

use std::collections::HashMap;

use chrono::{FixedOffset, Local, NaiveDate, Offset};
use itertools::Itertools;

use crate::record::{KindFilter, Record};

/// Turns a record sequence into a [`CalendarState`].
///
/// Due dates come with their own UTC offset; what day an item belongs to depends on where the
/// viewer is. The offset is injected rather than read from the environment, so that "same
/// instant, which local date?" stays a pure, testable question.
#[derive(Clone, Copy, Debug)]
pub struct CalendarIngestor {
    offset: FixedOffset,
}

impl CalendarIngestor {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// An ingestor for the zone this process currently runs in
    pub fn local() -> Self {
        Self::new(Local::now().offset().fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Build a fresh calendar state from a record batch.
    ///
    /// This is always clear-and-rebuild: nothing of any previous state is merged in. Records
    /// without a due date are kept in the flat listing but placed on no day at all.
    pub fn ingest(&self, records: Vec<Record>) -> CalendarState {
        let mut buckets: HashMap<NaiveDate, Vec<Record>> = HashMap::new();

        for record in &records {
            match record.due_at() {
                None => {
                    log::debug!(
                        "{} {:?} has no usable due date, leaving it off the calendar",
                        record.kind(),
                        record.name()
                    );
                }
                Some(due) => {
                    let date = due.with_timezone(&self.offset).date_naive();
                    buckets.entry(date).or_insert_with(Vec::new).push(record.clone());
                }
            }
        }

        CalendarState { records, buckets }
    }
}

/// Everything the calendar currently knows, as one immutable snapshot.
///
/// A refresh never mutates a `CalendarState`: it builds a new one and swaps it in wholesale.
/// Consumers get a read handle to a snapshot and must not hold on to it across a refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalendarState {
    /// Every record of the batch, in fetch order, including the ones without a due date
    records: Vec<Record>,
    /// The records that could be placed on a day, keyed by local date, in fetch order within a day
    buckets: HashMap<NaiveDate, Vec<Record>>,
}

impl CalendarState {
    /// All records, in fetch order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The records matching a kind filter, in fetch order
    pub fn records_matching(&self, filter: KindFilter) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| filter.matches(record.kind()))
            .cloned()
            .collect()
    }

    /// The records due on one local date (empty when the day is free)
    pub fn on_date(&self, date: NaiveDate) -> &[Record] {
        self.buckets.get(&date).map(|records| records.as_slice()).unwrap_or(&[])
    }

    /// Every day that has at least one record, sorted
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.buckets.keys().copied().sorted().collect()
    }

    /// Iterate over the populated days, in no particular order
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[Record])> + '_ {
        self.buckets.iter().map(|(date, records)| (*date, records.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::record::{parse_timestamp, ItemKind, Score};

    fn est() -> CalendarIngestor {
        CalendarIngestor::new(FixedOffset::west_opt(5 * 3600).unwrap())
    }

    fn record(name: &str, due_at: Option<&str>) -> Record {
        Record::new(
            "Math 101".to_string(),
            ItemKind::Assignment,
            name.to_string(),
            due_at.map(|text| parse_timestamp(text).unwrap()),
            Some(10.0),
            Score::Unavailable,
        )
    }

    #[test]
    fn buckets_under_the_viewers_local_date() {
        let state = est().ingest(vec![record("PS1", Some("2024-12-05T23:30:00-05:00"))]);

        let december_fifth = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(state.on_date(december_fifth).len(), 1);
        assert_eq!(state.dates(), vec![december_fifth]);
    }

    #[test]
    fn the_same_instant_lands_on_another_date_in_another_zone() {
        // 2024-12-05T23:30-05:00 is 2024-12-06T04:30Z
        let utc = CalendarIngestor::new(FixedOffset::east_opt(0).unwrap());
        let state = utc.ingest(vec![record("PS1", Some("2024-12-05T23:30:00-05:00"))]);

        assert_eq!(state.dates(), vec![NaiveDate::from_ymd_opt(2024, 12, 6).unwrap()]);
    }

    #[test]
    fn undated_records_are_listed_but_never_bucketed() {
        let state = est().ingest(vec![
            record("PS1", Some("2024-12-05T23:30:00-05:00")),
            record("PS2", None),
        ]);

        assert_eq!(state.len(), 2);
        assert_eq!(state.dates().len(), 1);
        let bucketed: usize = state.days().map(|(_, records)| records.len()).sum();
        assert_eq!(bucketed, 1);
        assert!(state.records().iter().any(|r| r.name() == "PS2"));
    }

    #[test]
    fn order_is_preserved_within_a_date() {
        let state = est().ingest(vec![
            record("first", Some("2024-12-05T10:00:00-05:00")),
            record("second", Some("2024-12-05T23:30:00-05:00")),
            record("third", Some("2024-12-05T08:00:00-05:00")),
        ]);

        let names: Vec<&str> = state
            .on_date(NaiveDate::from_ymd_opt(2024, 12, 5).unwrap())
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn ingesting_the_same_batch_twice_yields_the_same_state() {
        let batch = vec![
            record("PS1", Some("2024-12-05T23:30:00-05:00")),
            record("PS2", None),
            record("PS3", Some("2024-12-20T12:00:00-05:00")),
        ];
        assert_eq!(est().ingest(batch.clone()), est().ingest(batch));
    }
}
