//! # Severity Levels and Exit Statuses
//!
//! Four severities, ordered from purely advisory to run-aborting, and the
//! status values an audit can end with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// No errors or warnings were recorded.
pub const STATUS_CLEAN: i32 = 0;

/// At least one warning and no error was recorded.
pub const STATUS_WARNING: i32 = 100;

/// At least one error was recorded.
pub const STATUS_ERROR: i32 = 200;

/// The audit could not run: the descriptor file was not found.
pub const STATUS_NOT_RUN: i32 = -1;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory only. Never affects the exit status.
    Info,
    /// Style or convention problem.
    Warning,
    /// A real defect in the charm.
    Error,
    /// Checking cannot continue.
    Fatal,
}

impl Severity {
    /// The one-letter tag that prefixes rendered findings.
    ///
    /// Fatal findings share the error tag; their message carries a
    /// `FATAL:` marker instead.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "I",
            Self::Warning => "W",
            Self::Error | Self::Fatal => "E",
        }
    }

    /// Lowercase name, as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Status this severity raises the ledger to, if any.
    pub(crate) fn status_floor(self) -> Option<i32> {
        match self {
            Self::Info | Self::Fatal => None,
            Self::Warning => Some(STATUS_WARNING),
            Self::Error => Some(STATUS_ERROR),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn tags() {
        assert_eq!(Severity::Info.tag(), "I");
        assert_eq!(Severity::Warning.tag(), "W");
        assert_eq!(Severity::Error.tag(), "E");
        assert_eq!(Severity::Fatal.tag(), "E");
    }

    #[test]
    fn fatal_and_info_leave_status_alone() {
        assert_eq!(Severity::Info.status_floor(), None);
        assert_eq!(Severity::Fatal.status_floor(), None);
        assert_eq!(Severity::Warning.status_floor(), Some(STATUS_WARNING));
        assert_eq!(Severity::Error.status_floor(), Some(STATUS_ERROR));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
