#![deny(missing_docs)]

//! # proof-core — Foundational Types for charm-proof
//!
//! The leaf of the charm-proof crate graph. Defines the vocabulary every
//! rule speaks: severities, findings, the per-run severity ledger, the
//! structured error hierarchy, the parsed charm descriptor, and the
//! narrow filesystem view through which rules observe a charm.
//!
//! ## Key Design Principles
//!
//! 1. **One ledger per audit.** Every finding flows through
//!    [`Ledger::record`]. There is no process-wide severity state; the
//!    ledger is created by the orchestrator and threaded through each
//!    check by `&mut` reference.
//!
//! 2. **Explicit halting.** A check that must stop the audit returns a
//!    [`Halt`] inside a [`Flow`]. Nothing in the engine exits the
//!    process; the caller inspects the flow after each stage.
//!
//! 3. **Absence is a branch, not an error.** Optional descriptor fields
//!    are read through `Option`, never through a failed lookup.
//!
//! 4. **Read-only collaborators.** The [`CharmSource`] trait exposes only
//!    existence, listing, permission, and text retrieval. Rules cannot
//!    mutate the audited charm.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `proof-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod ledger;
pub mod severity;
pub mod source;

// Re-export primary types for ergonomic imports.
pub use descriptor::CharmDescriptor;
pub use error::{ProofError, ProofResult};
pub use ledger::{AuditReport, Finding, Flow, Halt, Ledger};
pub use severity::{Severity, STATUS_CLEAN, STATUS_ERROR, STATUS_NOT_RUN, STATUS_WARNING};
pub use source::{CharmSource, LocalCharm};
