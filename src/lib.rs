//! This crate surfaces a student's LMS assignments and grades on a calendar.
//!
//! It provides a typed client for a Canvas-compatible REST API in the [`client`] module, that can be used as a stand-alone module.
//!
//! Because the upstream API offers no batch endpoints, the [`aggregator`] module walks every course, item and submission one by one, and tolerates a failure on any single fetch without losing the rest of the dataset. \
//! The [`calendar`] module turns the aggregated records into a date-bucketed [`CalendarState`], and the [`progress`] module derives per-day and per-month point totals from it.
//!
//! These pieces are tied together by a [`Planner`](planner::Planner), which owns the current calendar snapshot and swaps it atomically on every refresh.

pub mod traits;

pub mod error;
pub use error::Error;
mod course;
pub use course::{Course, CourseId};
mod record;
pub use record::{ItemKind, KindFilter, Record, Score};
mod event;
pub use event::Event;

pub mod client;
pub mod endpoint;
pub mod aggregator;
pub use aggregator::GradeAggregator;
pub mod calendar;
pub use calendar::{CalendarIngestor, CalendarState};
pub mod progress;
pub use progress::PointTotals;
pub mod refresh_progress;
pub mod planner;
pub use planner::Planner;

pub mod config;
pub mod mock_behaviour;
pub mod mock_lms;
