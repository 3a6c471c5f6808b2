//! Error kinds for mefx operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on ErrorKind to decide how to phrase the message for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Report errors
    // =========================================================================
    /// A composition report could not be decoded
    DeserializationFailed,

    /// A report or query referenced a part that does not exist
    PartNotFound,

    // =========================================================================
    // Graph errors
    // =========================================================================
    /// The rejection graph broke one of its construction invariants
    InvariantViolation,

    /// Graph destination has an unsupported extension
    InvalidExtension,

    // =========================================================================
    // Whitelist errors
    // =========================================================================
    /// A whitelist regular expression failed to compile
    InvalidPattern,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Directory traversal failed
    TraversalFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind aborts the run by default
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::InvariantViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::PartNotFound.to_string(), "PartNotFound");
        assert_eq!(ErrorKind::InvalidExtension.as_str(), "InvalidExtension");
    }

    #[test]
    fn test_is_fatal() {
        assert!(ErrorKind::InvariantViolation.is_fatal());
        assert!(!ErrorKind::PartNotFound.is_fatal());
        assert!(!ErrorKind::InvalidPattern.is_fatal());
        assert!(!ErrorKind::IoFailed.is_fatal());
    }
}
