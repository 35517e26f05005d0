//! # Proof Command
//!
//! Resolves the charm, assembles the [`AuditConfig`] from `--config` and
//! `--template`, runs the audit, and renders the report.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use proof_core::{AuditReport, LocalCharm};
use proof_rules::AuditConfig;

/// Arguments for a charm audit.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Charm directory, or a charm name looked up under $CHARM_HOME.
    #[arg(value_name = "CHARM")]
    pub charm: Option<PathBuf>,

    /// YAML file with audit settings (README template, extra hazards).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// README template to detect boilerplate against.
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Output format for findings.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How findings are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `E:`/`W:`/`I:` line per finding.
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    charm: String,
    #[serde(flatten)]
    report: &'a AuditReport,
}

/// Execute a charm audit, writing findings to `out`.
///
/// Returns the process exit code derived from the audit status.
pub fn run_proof(args: &ProofArgs, charm_home: Option<&OsStr>, out: &mut dyn Write) -> Result<u8> {
    let path = crate::resolve_charm_path(args.charm.as_deref(), charm_home)?;
    tracing::debug!(charm = %path.display(), "resolved charm directory");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(template) = &args.template {
        config.readme_template = Some(template.clone());
    }

    let charm = LocalCharm::new(&path);
    let report = proof_rules::audit(&charm, &config).context("invalid audit configuration")?;
    render(&report, &path, args.format, out)?;
    Ok(crate::exit_code(report.status))
}

/// Load audit settings. No path, or an empty file, means the defaults.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a valid [`AuditConfig`].
pub fn load_config(path: Option<&Path>) -> Result<AuditConfig> {
    let Some(path) = path else {
        return Ok(AuditConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(AuditConfig::default());
    }
    serde_yaml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Write `report` to `out` in the requested format.
pub fn render(
    report: &AuditReport,
    charm: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for finding in &report.findings {
                writeln!(out, "{}", finding.render())?;
            }
        }
        OutputFormat::Json => {
            let doc = JsonReport {
                charm: charm.display().to_string(),
                report,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
