//! # Hook Inventory & Content Scanner
//!
//! Checks a single hook under `hooks/`: presence against its requirement
//! class, the owner-executable bit, and a line-by-line scan of its text
//! against a table of hazard rules.
//!
//! Hazard rules are data, not control flow. The built-in table lives in
//! [`BUILTIN_HAZARDS`]; callers can append their own via
//! [`HazardRule::new`]. Matching is an unanchored, case-sensitive regex
//! search over each physical line.

use std::path::{Path, PathBuf};

use regex::Regex;

use proof_core::{CharmSource, Ledger, ProofError, ProofResult};

/// Directory under the charm root that holds hooks.
pub const HOOKS_DIR: &str = "hooks";

/// Built-in `(pattern, message)` hazard table.
pub const BUILTIN_HAZARDS: &[(&str, &str)] = &[(
    r"http://169\.254\.169\.254/",
    "hook accesses EC2 metadata service directly",
)];

/// How much a missing hook matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookRequirement {
    /// Missing is an error.
    Required,
    /// Missing is a warning.
    Recommended,
    /// Missing is silent.
    Optional,
}

/// One hazard rule: a compiled pattern and the message to report.
#[derive(Debug, Clone)]
pub struct HazardRule {
    pattern: Regex,
    message: String,
}

impl HazardRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::HazardPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn new(pattern: &str, message: impl Into<String>) -> ProofResult<Self> {
        let compiled = Regex::new(pattern).map_err(|e| ProofError::HazardPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            message: message.into(),
        })
    }

    /// Whether this rule fires on `line`.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Message reported when the rule fires.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Compile [`BUILTIN_HAZARDS`].
pub fn builtin_rules() -> ProofResult<Vec<HazardRule>> {
    BUILTIN_HAZARDS
        .iter()
        .map(|(pattern, message)| HazardRule::new(pattern, *message))
        .collect()
}

/// Checks hooks of one charm against a fixed rule table.
pub struct HookScanner<'a> {
    source: &'a dyn CharmSource,
    rules: &'a [HazardRule],
}

impl<'a> HookScanner<'a> {
    /// Create a scanner over `source` using `rules`.
    pub fn new(source: &'a dyn CharmSource, rules: &'a [HazardRule]) -> Self {
        Self { source, rules }
    }

    /// Path of a hook relative to the charm root.
    pub fn hook_path(hook: &str) -> PathBuf {
        Path::new(HOOKS_DIR).join(hook)
    }

    /// Check one hook and return whether it exists.
    ///
    /// A missing hook is reported according to `requirement`. An existing
    /// hook is checked for the owner-executable bit and scanned against
    /// every hazard rule; each match is a warning tagged with the hook
    /// name and 1-based line number.
    pub fn check(&self, ledger: &mut Ledger, hook: &str, requirement: HookRequirement) -> bool {
        let rel = Self::hook_path(hook);
        if !self.source.exists(&rel) {
            match requirement {
                HookRequirement::Required => ledger.error(format!("missing hook {hook}")),
                HookRequirement::Recommended => {
                    ledger.warn(format!("missing recommended hook {hook}"))
                }
                HookRequirement::Optional => {}
            }
            return false;
        }

        match self.source.is_owner_executable(&rel) {
            Ok(true) => {}
            Ok(false) => ledger.warn(format!("{hook} not executable")),
            Err(e) => {
                tracing::warn!(hook, error = %e, "cannot stat hook");
            }
        }

        match self.source.read_text(&rel) {
            Ok(text) => self.scan_content(ledger, hook, &text),
            Err(e) => ledger.warn(format!("cannot read hook {hook} ({e})")),
        }

        true
    }

    fn scan_content(&self, ledger: &mut Ledger, hook: &str, text: &str) {
        for (idx, line) in text.lines().enumerate() {
            for rule in self.rules {
                if rule.matches(line) {
                    ledger.warn(format!("({hook}:{}) - {}", idx + 1, rule.message()));
                }
            }
        }
    }
}
