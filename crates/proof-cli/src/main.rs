//! # charm-proof entry point
//!
//! Parses arguments, initializes logging on stderr, and runs the audit.
//! Findings go to stdout; the exit code carries the verdict.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use proof_cli::proof::{run_proof, ProofArgs};
use proof_cli::CHARM_HOME_VAR;

/// Check a charm directory against charm conventions.
///
/// Exits 0 when clean, 100 on warnings, 200 on errors, 255 when no
/// metadata.yaml was found, and 1 on operational failure.
#[derive(Parser, Debug)]
#[command(name = "charm-proof", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    proof: ProofArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("charm-proof v{} starting", env!("CARGO_PKG_VERSION"));

    let charm_home = std::env::var_os(CHARM_HOME_VAR);
    let mut stdout = std::io::stdout().lock();

    match run_proof(&cli.proof, charm_home.as_deref(), &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
