//! Error status: report-and-continue versus abort.

use std::fmt;

/// How the caller should treat an error.
///
/// - `Reportable`: tell the user and carry on with the next operation
/// - `Fatal`: an internal invariant broke, stop the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// The user can act on this error; the process keeps going.
    ///
    /// Examples: PartNotFound, InvalidExtension, FileNotFound
    #[default]
    Reportable,

    /// The error indicates a bug or a broken upstream contract.
    ///
    /// Examples: InvariantViolation
    Fatal,
}

impl ErrorStatus {
    /// Check if the process should stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorStatus::Fatal)
    }

    /// Get status as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Reportable => "reportable",
            ErrorStatus::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fatal() {
        assert!(!ErrorStatus::Reportable.is_fatal());
        assert!(ErrorStatus::Fatal.is_fatal());
        assert_eq!(ErrorStatus::default(), ErrorStatus::Reportable);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ErrorStatus::Fatal.to_string(), "fatal");
        assert_eq!(ErrorStatus::Reportable.to_string(), "reportable");
    }
}
