//! # Error Types
//!
//! Errors here describe conditions that prevent a check from running at
//! all. Convention violations found in a charm are never errors in this
//! sense; they are [`Finding`](crate::Finding)s recorded in the ledger.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for charm-proof.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The descriptor file does not exist.
    #[error("descriptor not found: {path}")]
    DescriptorNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The descriptor file is not valid YAML.
    #[error("cannot parse {path}: {source}")]
    DescriptorParse {
        /// Path of the descriptor.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The descriptor parsed, but its top level is not a mapping.
    #[error("cannot parse {path}: {detail}")]
    DescriptorShape {
        /// Path of the descriptor.
        path: PathBuf,
        /// What was found instead of a mapping.
        detail: String,
    },

    /// A hazard rule carries a pattern that does not compile.
    #[error("invalid hazard pattern {pattern:?}: {reason}")]
    HazardPattern {
        /// The offending pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for charm-proof operations.
pub type ProofResult<T> = Result<T, ProofError>;
