//! # Audit Configuration
//!
//! Optional knobs for an audit, deserialized from a YAML file by the CLI:
//!
//! ```yaml
//! readme_template: /usr/share/charm-tools/templates/charm/README.ex
//! hazards:
//!   - pattern: 'chmod\s+777'
//!     message: hook makes files world-writable
//! ```
//!
//! An empty or absent file means the defaults: the bundled README
//! template and the built-in hazard table.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use proof_core::ProofResult;

use crate::boilerplate::BoilerplateDetector;
use crate::hooks::{builtin_rules, HazardRule};

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// README template to detect boilerplate against, replacing the
    /// bundled one.
    pub readme_template: Option<PathBuf>,
    /// Hazard rules appended to the built-in table.
    pub hazards: Vec<HazardEntry>,
}

/// An uncompiled hazard rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HazardEntry {
    /// Regular expression searched for on each hook line.
    pub pattern: String,
    /// Message reported on a match.
    pub message: String,
}

/// The README template an audit compares against.
#[derive(Debug, Clone)]
pub enum ReadmeTemplate {
    /// Template text was available.
    Loaded(BoilerplateDetector),
    /// A configured template could not be read.
    Unavailable {
        /// Path that was tried.
        path: PathBuf,
        /// Why it could not be read.
        reason: String,
    },
}

impl AuditConfig {
    /// Built-in hazard rules followed by the configured ones.
    ///
    /// # Errors
    ///
    /// Fails if any configured pattern does not compile.
    pub fn hazard_rules(&self) -> ProofResult<Vec<HazardRule>> {
        let mut rules = builtin_rules()?;
        for entry in &self.hazards {
            rules.push(HazardRule::new(&entry.pattern, entry.message.clone())?);
        }
        Ok(rules)
    }

    /// Load the README template. Read failures are not errors here; the
    /// metadata validator reports them as findings.
    pub fn readme_template(&self) -> ReadmeTemplate {
        let Some(path) = &self.readme_template else {
            return ReadmeTemplate::Loaded(BoilerplateDetector::bundled());
        };
        match std::fs::read(path) {
            Ok(bytes) => ReadmeTemplate::Loaded(BoilerplateDetector::from_template(
                &String::from_utf8_lossy(&bytes),
            )),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read README template");
                ReadmeTemplate::Unavailable {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
