//! This module provides ways to tweak a mocked LMS, so that it can return errors on some tests
#![cfg(feature = "mock_lms")]

use crate::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a function fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub list_courses_behaviour: (u32, u32),
    pub list_assignments_behaviour: (u32, u32),
    pub list_quizzes_behaviour: (u32, u32),
    pub get_submission_behaviour: (u32, u32),
    pub list_calendar_events_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_courses_behaviour: (0, n_fails),
            list_assignments_behaviour: (0, n_fails),
            list_quizzes_behaviour: (0, n_fails),
            get_submission_behaviour: (0, n_fails),
            list_calendar_events_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_courses(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_courses_behaviour, "list_courses")
    }
    pub fn can_list_assignments(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_assignments_behaviour, "list_assignments")
    }
    pub fn can_list_quizzes(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_quizzes_behaviour, "list_quizzes")
    }
    pub fn can_get_submission(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_submission_behaviour, "get_submission")
    }
    pub fn can_list_calendar_events(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_calendar_events_behaviour, "list_calendar_events")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Error> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(Error::Upstream {
                url: format!("mock://{}", descr),
                status: 503,
            })
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_list_courses().is_ok());
        assert!(ok.can_list_courses().is_ok());
        assert!(ok.can_list_courses().is_ok());
        assert!(ok.can_get_submission().is_ok());
        assert!(ok.can_get_submission().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list_courses().is_err());
        assert!(now.can_list_quizzes().is_err());
        assert!(now.can_list_quizzes().is_err());
        assert!(now.can_list_courses().is_err());
        assert!(now.can_list_courses().is_ok());
        assert!(now.can_list_courses().is_ok());
        assert!(now.can_list_quizzes().is_ok());

        let mut custom = MockBehaviour {
            list_courses_behaviour: (0, 1),
            get_submission_behaviour: (1, 3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_list_courses().is_err());
        assert!(custom.can_list_courses().is_ok());
        assert!(custom.can_list_courses().is_ok());
        assert!(custom.can_get_submission().is_ok());
        assert!(custom.can_get_submission().is_err());
        assert!(custom.can_get_submission().is_err());
        assert!(custom.can_get_submission().is_err());
        assert!(custom.can_get_submission().is_ok());
        assert!(custom.can_get_submission().is_ok());
    }
}
