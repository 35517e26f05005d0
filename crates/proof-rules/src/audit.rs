//! # Audit Orchestrator
//!
//! Runs every check for one charm, in order:
//!
//! 1. Load and parse the descriptor. A missing file halts the run with
//!    [`STATUS_NOT_RUN`]; an unparseable one is fatal.
//! 2. Descriptor-level checks ([`MetadataValidator`]).
//! 3. The `revision` file.
//!
//! The ledger is created here, threaded through each stage, and closed
//! into an [`AuditReport`] at the end.

use proof_core::{
    AuditReport, CharmDescriptor, CharmSource, Flow, Ledger, ProofError, ProofResult,
    STATUS_NOT_RUN,
};

use crate::config::{AuditConfig, ReadmeTemplate};
use crate::hooks::{HazardRule, HookScanner};
use crate::metadata::MetadataValidator;
use crate::revision;

/// A prepared audit of one charm.
pub struct Audit<'a> {
    source: &'a dyn CharmSource,
    rules: Vec<HazardRule>,
    template: ReadmeTemplate,
}

impl<'a> Audit<'a> {
    /// Prepare an audit of `source`.
    ///
    /// # Errors
    ///
    /// Fails if a configured hazard pattern does not compile.
    pub fn new(source: &'a dyn CharmSource, config: &AuditConfig) -> ProofResult<Self> {
        Ok(Self {
            source,
            rules: config.hazard_rules()?,
            template: config.readme_template(),
        })
    }

    /// Run all checks and derive the verdict.
    pub fn run(&self) -> AuditReport {
        tracing::info!(charm = %self.source.root().display(), "auditing charm");
        let mut ledger = Ledger::new();
        let flow = self.run_stages(&mut ledger);
        let report = ledger.finish(flow);
        tracing::info!(
            status = report.status,
            halted = report.halted,
            findings = report.findings.len(),
            "audit finished"
        );
        report
    }

    fn run_stages(&self, ledger: &mut Ledger) -> Flow {
        let descriptor = self.load_descriptor(ledger)?;

        tracing::debug!("validating descriptor");
        let hooks = HookScanner::new(self.source, &self.rules);
        MetadataValidator::new(self.source, &hooks, &self.template).validate(ledger, &descriptor);

        tracing::debug!("checking revision file");
        revision::check_revision_file(ledger, self.source);
        Ok(())
    }

    fn load_descriptor(&self, ledger: &mut Ledger) -> Flow<CharmDescriptor> {
        match CharmDescriptor::load(self.source) {
            Ok(descriptor) => Ok(descriptor),
            Err(ProofError::DescriptorNotFound { .. }) => Err(ledger.abort(
                format!(
                    "could not find metadata file for {}",
                    self.source.root().display()
                ),
                STATUS_NOT_RUN,
            )),
            Err(e) => Err(ledger.fatal(e.to_string())),
        }
    }
}

/// Audit `source` with `config`.
///
/// # Errors
///
/// Fails only if the configuration is unusable; charm problems are
/// findings in the returned report.
pub fn audit(source: &dyn CharmSource, config: &AuditConfig) -> ProofResult<AuditReport> {
    Ok(Audit::new(source, config)?.run())
}
