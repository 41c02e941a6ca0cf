//! Errors of the timetabling domain.

use thiserror::Error;

/// Errors raised while building an instance or reading a timetable.
#[derive(Debug, Error)]
pub enum TimetablingError {
    #[error("course {0} does not exist")]
    UnknownCourse(String),

    #[error("room {0} does not exist")]
    UnknownRoom(String),

    #[error("period {0} does not exist")]
    UnknownPeriod(String),

    #[error("group {0} does not exist")]
    UnknownGroup(String),

    /// The instance description is inconsistent.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A course requires more lectures than it has available periods.
    #[error("course {course} needs {lectures} lectures but only {available} periods are available")]
    NotEnoughPeriods {
        course: String,
        lectures: usize,
        available: usize,
    },

    /// A lecture is scheduled in a period the course cannot use.
    #[error("lecture of {course} at unavailable period {period}")]
    UnavailablePeriod { course: String, period: String },

    #[error("wrong number of lectures for {course}: expected {expected}, found {found}")]
    WrongLectureCount {
        course: String,
        expected: usize,
        found: usize,
    },

    /// A persisted timetable could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_messages() {
        assert_eq!(
            TimetablingError::UnknownRoom("B12".into()).to_string(),
            "room B12 does not exist"
        );
        let e = TimetablingError::WrongLectureCount {
            course: "Algebra".into(),
            expected: 4,
            found: 3,
        };
        assert_eq!(
            e.to_string(),
            "wrong number of lectures for Algebra: expected 4, found 3"
        );
    }

    #[test]
    fn test_into_engine_error() {
        let e = crate::error::LocalSearchError::Output(Box::new(
            TimetablingError::UnknownCourse("X".into()),
        ));
        assert_eq!(e.to_string(), "output error: course X does not exist");
    }
}
