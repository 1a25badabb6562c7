//! Error taxonomy for parsing and scheduling.

use thiserror::Error;

/// Result type for taskflow operations.
pub type Result<T> = std::result::Result<T, TaskflowError>;

#[derive(Debug, Error)]
pub enum TaskflowError {
    /// A pattern table failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Relative date arithmetic left the supported calendar range.
    #[error("date out of range: {base} {offset}")]
    DateOutOfRange { base: String, offset: String },

    /// A captured count could not be read as an integer.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// A store record has no due date to schedule against.
    #[error("task {0} has no due date")]
    MissingDueDate(String),

    /// A store record carries a due date that is neither a date nor a timestamp.
    #[error("task {id} has invalid due date '{value}'")]
    InvalidDueDate { id: String, value: String },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Scheduler settings that would make every day unusable.
    #[error("invalid scheduler config: {0}")]
    InvalidSchedulerConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = TaskflowError::InvalidDueDate {
            id: "42".into(),
            value: "soon".into(),
        };
        assert_eq!(e.to_string(), "task 42 has invalid due date 'soon'");

        let e = TaskflowError::MissingDueDate("abc".into());
        assert_eq!(e.to_string(), "task abc has no due date");
    }
}
