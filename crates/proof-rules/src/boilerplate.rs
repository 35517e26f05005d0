//! # Boilerplate Detector
//!
//! Finds README content copied verbatim from the charm scaffolding
//! template.
//!
//! Only "significant" template lines take part: a line qualifies when its
//! length in bytes, counting its line terminator, is at least
//! [`SIGNIFICANT_LINE_MIN_LEN`]. Each qualifying line is trimmed; lines
//! that trim to nothing are skipped and do not take an ordinal. A match
//! is a plain substring test against the whole candidate text, so a
//! template line found anywhere in the README counts.

use proof_core::Ledger;

/// Minimum raw length (terminator included) of a significant template line.
pub const SIGNIFICANT_LINE_MIN_LEN: usize = 25;

/// Name of the scaffolding README template.
pub const README_TEMPLATE_NAME: &str = "README.ex";

/// README template shipped with the tool.
pub const BUNDLED_README_TEMPLATE: &str = include_str!("../templates/README.ex");

/// Significant lines of one template, ready to match against candidates.
#[derive(Debug, Clone)]
pub struct BoilerplateDetector {
    lines: Vec<String>,
}

impl BoilerplateDetector {
    /// Extract the significant lines of `template`.
    pub fn from_template(template: &str) -> Self {
        let lines = template
            .split_inclusive('\n')
            .filter(|raw| raw.len() >= SIGNIFICANT_LINE_MIN_LEN)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { lines }
    }

    /// The bundled README template.
    pub fn bundled() -> Self {
        Self::from_template(BUNDLED_README_TEMPLATE)
    }

    /// Significant lines, in template order.
    pub fn significant_lines(&self) -> &[String] {
        &self.lines
    }

    /// Record an error for every significant line found in `candidate`.
    ///
    /// Returns the number of matches.
    pub fn scan(&self, ledger: &mut Ledger, candidate: &str, candidate_name: &str) -> usize {
        let mut matches = 0;
        for (idx, line) in self.lines.iter().enumerate() {
            if candidate.contains(line.as_str()) {
                ledger.error(format!(
                    "{candidate_name} Includes boilerplate {README_TEMPLATE_NAME} line {}",
                    idx + 1
                ));
                matches += 1;
            }
        }
        matches
    }
}

/// One-shot form of [`BoilerplateDetector::scan`].
pub fn scan(ledger: &mut Ledger, template: &str, candidate: &str, candidate_name: &str) -> usize {
    BoilerplateDetector::from_template(template).scan(ledger, candidate, candidate_name)
}
