//! # Severity Ledger
//!
//! Accumulates findings for one audit and keeps the running exit status.
//!
//! ## Status Rules
//!
//! - `error` raises the status to at least [`STATUS_ERROR`].
//! - `warning` raises the status to at least [`STATUS_WARNING`]; it can
//!   never lower an error status.
//! - `info` never changes the status.
//! - `fatal` records a finding and returns a [`Halt`] carrying the status
//!   accumulated *before* the fatal event. It never escalates.
//!
//! Every mutation goes through [`Ledger::record`], which appends the
//! finding and updates the status in one step. A concurrent front end
//! would only need to guard that one method.

use serde::Serialize;

use crate::severity::{Severity, STATUS_CLEAN};

/// A single recorded convention violation or advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// How serious the finding is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// Render the finding as one output line, e.g. `W: no README file`.
    pub fn render(&self) -> String {
        match self.severity {
            Severity::Fatal => format!("{}: FATAL: {}", self.severity.tag(), self.message),
            other => format!("{}: {}", other.tag(), self.message),
        }
    }
}

/// Signal that the audit must stop now, with the given final status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt {
    /// Final status of the aborted run.
    pub status: i32,
}

/// Outcome of a pipeline stage: continue with a value, or halt.
pub type Flow<T = ()> = Result<T, Halt>;

/// The per-run accumulator of findings and exit status.
#[derive(Debug, Default)]
pub struct Ledger {
    findings: Vec<Finding>,
    status: i32,
}

impl Ledger {
    /// Create an empty ledger with a clean status.
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
            status: STATUS_CLEAN,
        }
    }

    /// Append a finding and fold its severity into the running status.
    pub fn record(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%severity, %message, "finding recorded");
        if let Some(floor) = severity.status_floor() {
            self.status = self.status.max(floor);
        }
        self.findings.push(Finding { severity, message });
    }

    /// Record an advisory finding.
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warning, message);
    }

    /// Record an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, message);
    }

    /// Record a fatal finding and return the halt signal.
    ///
    /// The returned [`Halt`] carries the status as it stood before this
    /// call.
    #[must_use]
    pub fn fatal(&mut self, message: impl Into<String>) -> Halt {
        let status = self.status;
        self.record(Severity::Fatal, message);
        Halt { status }
    }

    /// Record an error and halt with a reserved status that overrides the
    /// accumulated one.
    #[must_use]
    pub fn abort(&mut self, message: impl Into<String>, status: i32) -> Halt {
        self.record(Severity::Error, message);
        Halt { status }
    }

    /// The running status.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// All findings recorded so far, in recording order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of findings at exactly the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Close the ledger and derive the verdict.
    pub fn finish(self, flow: Flow) -> AuditReport {
        let (status, halted) = match flow {
            Ok(()) => (self.status, false),
            Err(halt) => (halt.status, true),
        };
        AuditReport {
            findings: self.findings,
            status,
            halted,
        }
    }
}

/// Final, immutable result of one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Every finding, in recording order.
    pub findings: Vec<Finding>,
    /// Final status (0, 100, 200, or a reserved value).
    pub status: i32,
    /// Whether the run stopped before all checks executed.
    pub halted: bool,
}

impl AuditReport {
    /// Findings at exactly the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Whether any finding at the given severity mentions `needle`.
    pub fn mentions(&self, severity: Severity, needle: &str) -> bool {
        self.with_severity(severity).any(|f| f.message.contains(needle))
    }
}
