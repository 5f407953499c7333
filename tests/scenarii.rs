//! This module builds the mock LMS populations the integration tests run against
//!
//! The "campus" scenario is two courses worth of items spread over December 2024, with the usual
//! real-world warts: an item with no due date, an item with no points total, a submission that
//! exists but has no score yet, and an item nobody ever submitted.
#![cfg(feature = "mock_lms")]

use std::sync::{Arc, Mutex};

use chrono::FixedOffset;

use chalkboard::mock_behaviour::MockBehaviour;
use chalkboard::mock_lms::MockLms;
use chalkboard::traits::{ItemSummary, Submission};
use chalkboard::{CalendarIngestor, Course, Event, ItemKind};

pub const MATH: &str = "Math 101";
pub const PHYSICS: &str = "Physics 202";

pub const MATH_ID: &str = "101";
pub const PHYSICS_ID: &str = "202";

/// Eastern Standard Time, the zone all the scenario due dates are written in
pub fn est_ingestor() -> CalendarIngestor {
    CalendarIngestor::new(FixedOffset::west_opt(5 * 3600).unwrap())
}

/// The full campus population, with no scripted failures
pub fn populate_campus() -> MockLms {
    populate_campus_with_behaviour(Arc::new(Mutex::new(MockBehaviour::new())))
}

/// The full campus population, with a scripted behaviour attached
pub fn populate_campus_with_behaviour(behaviour: Arc<Mutex<MockBehaviour>>) -> MockLms {
    let mut lms = MockLms::new_with_behaviour(behaviour);

    lms.add_course(Course::new(MATH_ID.to_string(), MATH.to_string()));
    lms.add_course(Course::new(PHYSICS_ID.to_string(), PHYSICS.to_string()));

    // Math: two assignments and a quiz
    lms.add_assignment(MATH_ID, ItemSummary {
        id: 1,
        name: "Problem Set 1, part A".to_string(),
        due_at: Some("2024-12-05T23:30:00-05:00".to_string()),
        points_possible: Some(100.0),
    });
    lms.add_assignment(MATH_ID, ItemSummary {
        id: 2,
        name: "Problem Set 2".to_string(),
        due_at: None,
        points_possible: Some(50.0),
    });
    lms.add_quiz(MATH_ID, ItemSummary {
        id: 7,
        name: "Week 14 Quiz".to_string(),
        due_at: Some("2024-12-05T08:00:00-05:00".to_string()),
        points_possible: None,
    });

    // Physics: one assignment
    lms.add_assignment(PHYSICS_ID, ItemSummary {
        id: 3,
        name: "Lab Report | Optics".to_string(),
        due_at: Some("2024-12-12T17:00:00-05:00".to_string()),
        points_possible: Some(20.0),
    });

    // Graded, ungraded, and never-submitted: the Week 14 Quiz has no submission at all
    lms.set_submission(MATH_ID, ItemKind::Assignment, 1, Submission { score: Some(87.0) });
    lms.set_submission(MATH_ID, ItemKind::Assignment, 2, Submission { score: Some(40.0) });
    lms.set_submission(PHYSICS_ID, ItemKind::Assignment, 3, Submission { score: None });

    lms.add_event(Event::new("Finals Week".to_string(), None, false));
    lms.add_event(Event::new("Campus Closed".to_string(), None, true));

    lms
}

/// How many records the campus scenario must always produce, no matter how many submission
/// fetches fail: 3 Math items + 1 Physics item
pub const CAMPUS_RECORD_COUNT: usize = 4;
