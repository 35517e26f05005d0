//! # proof-cli — The `charm-proof` Command
//!
//! Audits one charm directory and prints its findings:
//!
//! ```bash
//! charm-proof                      # the current directory
//! charm-proof ./mysql              # a path
//! CHARM_HOME=~/charms charm-proof mysql
//! charm-proof mysql --format json --config proof.yaml
//! ```
//!
//! ## Exit Status
//!
//! - `0`, `100`, `200`: the audit verdict (clean, warnings, errors).
//! - `255`: no `metadata.yaml` was found, so the audit did not run.
//! - `1`: operational failure (bad arguments, unreadable config, the
//!   charm path is not a directory).

pub mod proof;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Environment variable naming the directory charms are looked up in.
pub const CHARM_HOME_VAR: &str = "CHARM_HOME";

/// Resolve the charm directory to audit.
///
/// No argument means the current directory. An argument that is an
/// existing directory is used as-is; anything else is looked up under
/// `charm_home` (default `.`).
///
/// # Errors
///
/// Fails if the resolved path is not a directory.
pub fn resolve_charm_path(charm: Option<&Path>, charm_home: Option<&OsStr>) -> Result<PathBuf> {
    let path = match charm {
        None => std::env::current_dir().context("cannot determine current directory")?,
        Some(p) if p.is_dir() => p.to_path_buf(),
        Some(p) => Path::new(charm_home.unwrap_or(OsStr::new("."))).join(p),
    };
    if !path.is_dir() {
        bail!("{} is not a directory, aborting", path.display());
    }
    Ok(path)
}

/// Map an audit status onto a process exit code. Negative reserved
/// statuses wrap the way a POSIX shell reports them (`-1` is `255`).
pub fn exit_code(status: i32) -> u8 {
    status.rem_euclid(256) as u8
}
