//! Point totals derived from a calendar snapshot
//!
//! These are pure functions: nothing here caches, so a total is always consistent with the
//! snapshot it was computed from. Rendering them (progress bars, percentages on day cells...) is
//! entirely the caller's business.

use chrono::{Datelike, NaiveDate};

use crate::calendar::CalendarState;
use crate::record::Record;

/// Possible and earned point sums over some scope (a day, a month).
///
/// Records without a points total, or with a total of zero, are excluded from both sums: an
/// ungraded practice item is not "zero out of zero". Records whose score is unavailable count
/// their possible points but contribute nothing earned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointTotals {
    points_possible: f64,
    points_earned: f64,
}

impl PointTotals {
    pub fn points_possible(&self) -> f64 {
        self.points_possible
    }

    pub fn points_earned(&self) -> f64 {
        self.points_earned
    }

    /// The earned/possible ratio, or `None` when nothing gradable is in scope.
    /// Callers never need a division-by-zero guard of their own.
    pub fn completion_ratio(&self) -> Option<f64> {
        if self.points_possible > 0.0 {
            Some(self.points_earned / self.points_possible)
        } else {
            None
        }
    }

    fn absorb(&mut self, record: &Record) {
        let possible = match record.points_possible() {
            None => return,
            Some(points) if points == 0.0 => return,
            Some(points) => points,
        };
        self.points_possible += possible;
        self.points_earned += record.points_earned().or_zero();
    }
}

/// Sum the points of everything due on one local date
pub fn daily_totals(state: &CalendarState, date: NaiveDate) -> PointTotals {
    let mut totals = PointTotals::default();
    for record in state.on_date(date) {
        totals.absorb(record);
    }
    totals
}

/// Sum the points of everything due in one month.
///
/// Recomputed from the snapshot every time, so it always equals the sum of [`daily_totals`] over
/// the month's populated dates.
pub fn monthly_totals(state: &CalendarState, year: i32, month: u32) -> PointTotals {
    let mut totals = PointTotals::default();
    for (date, records) in state.days() {
        if date.year() != year || date.month() != month {
            continue;
        }
        for record in records {
            totals.absorb(record);
        }
    }
    totals
}
