//! Graded items, and their normalized interchange form

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// The two families of gradable items the LMS exposes. They live on different endpoints and have
/// slightly different payloads, but once aggregated they are handled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Assignment,
    Quiz,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Assignment => write!(f, "assignment"),
            ItemKind::Quiz => write!(f, "quiz"),
        }
    }
}

/// The score the student earned on one item.
///
/// A submission may not exist, may not be graded yet, or may simply fail to fetch. All of these
/// are `Unavailable`, which is a distinct state from a genuine zero score: an `Unavailable` score
/// contributes 0 earned points to totals, but consumers can still tell "not graded" apart from
/// "got a zero".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    Available(f64),
    Unavailable,
}

impl Score {
    pub fn is_available(&self) -> bool {
        match self {
            Score::Available(_) => true,
            _ => false,
        }
    }

    pub fn points(&self) -> Option<f64> {
        match self {
            Score::Available(points) => Some(*points),
            Score::Unavailable => None,
        }
    }

    /// The earned points this score contributes to a total
    pub fn or_zero(&self) -> f64 {
        self.points().unwrap_or(0.0)
    }
}

bitflags! {
    /// Flags to tell which kinds of records should be returned
    pub struct KindFilter: u8 {
        const ASSIGNMENT = 1;
        const QUIZ = 2;
    }
}

impl KindFilter {
    pub fn matches(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Assignment => self.contains(KindFilter::ASSIGNMENT),
            ItemKind::Quiz => self.contains(KindFilter::QUIZ),
        }
    }
}

impl Default for KindFilter {
    fn default() -> Self {
        KindFilter::all()
    }
}

/// One graded item, tagged with its owning course title.
///
/// This is the unit of work of the whole pipeline: the aggregator emits a flat sequence of
/// records, the calendar buckets them by due date, and the progress totals sum their points.
///
/// Records serialize to a self-describing JSON document with a fixed field set, so that item
/// names containing commas, pipes or any other delimiter-like characters round-trip exactly.
/// `due_at` keeps the UTC offset the server sent; the calendar decides later what local date an
/// instant belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    course: String,
    kind: ItemKind,
    name: String,
    due_at: Option<DateTime<FixedOffset>>,
    points_possible: Option<f64>,
    points_earned: Score,
}

impl Record {
    pub fn new(
        course: String,
        kind: ItemKind,
        name: String,
        due_at: Option<DateTime<FixedOffset>>,
        points_possible: Option<f64>,
        points_earned: Score,
    ) -> Self {
        Self {
            course,
            kind,
            name,
            due_at,
            points_possible,
            points_earned,
        }
    }

    pub fn course(&self) -> &str { &self.course }
    pub fn kind(&self) -> ItemKind { self.kind }
    pub fn name(&self) -> &str { &self.name }
    pub fn due_at(&self) -> Option<DateTime<FixedOffset>> { self.due_at }
    pub fn points_possible(&self) -> Option<f64> { self.points_possible }
    pub fn points_earned(&self) -> Score { self.points_earned }

    /// Serialize this record to its JSON wire form
    pub fn encode(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| Error::Parse {
            context: format!("record {:?}", self.name),
            detail: err.to_string(),
        })
    }

    /// Serialize a whole batch to a single JSON array
    pub fn encode_batch(records: &[Record]) -> Result<String, Error> {
        serde_json::to_string(records).map_err(|err| Error::Parse {
            context: "record batch".to_string(),
            detail: err.to_string(),
        })
    }

    /// Parse one record from its JSON wire form.
    ///
    /// A present but invalid `due_at` is reported as [`Error::DateParse`], so that the caller
    /// knows exactly which field was at fault.
    pub fn decode(text: &str) -> Result<Record, Error> {
        let wire: WireRecord = serde_json::from_str(text).map_err(|err| Error::Parse {
            context: "record".to_string(),
            detail: err.to_string(),
        })?;
        Record::try_from(wire)
    }

    /// Parse a JSON array of records, decoding each element independently.
    ///
    /// The outer array must be well-formed JSON; after that, one malformed record yields an `Err`
    /// in its slot without invalidating the records around it.
    pub fn decode_batch(text: &str) -> Result<Vec<Result<Record, Error>>, Error> {
        let wires: Vec<WireRecord> = serde_json::from_str(text).map_err(|err| Error::Parse {
            context: "record batch".to_string(),
            detail: err.to_string(),
        })?;
        Ok(wires.into_iter().map(Record::try_from).collect())
    }
}

/// Parse an RFC 3339 timestamp, keeping its UTC offset
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, Error> {
    DateTime::parse_from_rfc3339(value).map_err(|source| Error::DateParse {
        value: value.to_string(),
        source,
    })
}

/// The fixed field set a record serializes to.
/// `points_earned: null` encodes [`Score::Unavailable`]; `due_at` is RFC 3339 with the original offset.
#[derive(Serialize, Deserialize)]
struct WireRecord {
    course: String,
    kind: ItemKind,
    name: String,
    due_at: Option<String>,
    points_possible: Option<f64>,
    points_earned: Option<f64>,
}

impl From<&Record> for WireRecord {
    fn from(record: &Record) -> WireRecord {
        WireRecord {
            course: record.course.clone(),
            kind: record.kind,
            name: record.name.clone(),
            due_at: record.due_at.map(|due| due.to_rfc3339()),
            points_possible: record.points_possible,
            points_earned: record.points_earned.points(),
        }
    }
}

impl TryFrom<WireRecord> for Record {
    type Error = Error;

    fn try_from(wire: WireRecord) -> Result<Record, Error> {
        let due_at = match wire.due_at {
            None => None,
            Some(text) => Some(parse_timestamp(&text)?),
        };
        let points_earned = match wire.points_earned {
            Some(points) => Score::Available(points),
            None => Score::Unavailable,
        };
        Ok(Record {
            course: wire.course,
            kind: wire.kind,
            name: wire.name,
            due_at,
            points_possible: wire.points_possible,
            points_earned,
        })
    }
}

/// Used to support serde
impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        WireRecord::from(self).serialize(serializer)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Record, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireRecord::deserialize(deserializer)?;
        Record::try_from(wire).map_err(serde::de::Error::custom)
    }
}
