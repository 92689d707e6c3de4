//! Fatal-condition reporting
//!
//! Contract violations are not recoverable. They are written to a diagnostic
//! sink and the current thread panics; no partial state is repaired.

use crate::core::EngineError;
use std::panic::Location;

/// Everything known about a violated invariant at the point of failure
#[derive(Debug, Clone)]
pub struct FatalReport<'a> {
    /// The violated contract
    pub error: &'a EngineError,
    /// Call site that triggered the violation
    pub location: &'static Location<'static>,
    /// Number of live entities when it happened
    pub live_entities: usize,
}

impl std::fmt::Display for FatalReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (at {}, {} live entities)",
            self.error, self.location, self.live_entities
        )
    }
}

/// Diagnostic sink consulted before the engine stops
pub trait FatalReporter {
    /// Record the report. Must not try to recover.
    fn report(&self, report: &FatalReport<'_>);
}

/// Reporter that writes through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FatalReporter for LogReporter {
    fn report(&self, report: &FatalReport<'_>) {
        log::error!("fatal: {report}");
    }
}

/// Report `error` and stop
#[track_caller]
pub fn fail(reporter: &dyn FatalReporter, error: &EngineError, live_entities: usize) -> ! {
    let report = FatalReport {
        error,
        location: Location::caller(),
        live_entities,
    };
    reporter.report(&report);
    panic!("{report}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording(RefCell<Vec<String>>);

    impl FatalReporter for Recording {
        fn report(&self, report: &FatalReport<'_>) {
            self.0.borrow_mut().push(report.to_string());
        }
    }

    #[test]
    fn test_reporter_sees_report_before_panic() {
        let recording = Recording(RefCell::new(Vec::new()));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            fail(&recording, &EngineError::CapacityExceeded { max: 4 }, 4)
        }));

        assert!(result.is_err());
        let lines = recording.0.borrow();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("entity capacity of 4 exceeded"));
        assert!(lines[0].contains("4 live entities"));
    }
}
