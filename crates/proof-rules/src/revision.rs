//! Revision checks: the deprecated descriptor field and the `revision`
//! file at the charm root.

use std::path::Path;

use serde_json::Value;

use proof_core::{CharmSource, Ledger};

/// File at the charm root holding the revision number.
pub const REVISION_FILE: &str = "revision";

/// Whether a descriptor `revision` value reads as a non-negative integer.
///
/// Integers, integer strings, booleans (0 / 1) and finite floats
/// (truncated toward zero) are accepted.
pub fn is_non_negative_revision(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i >= 0
            } else if n.is_u64() {
                true
            } else {
                n.as_f64().is_some_and(|f| f.is_finite() && f.trunc() >= 0.0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            (is_integer_literal(s) && !s.starts_with('-')) || is_negative_zero(s)
        }
        _ => false,
    }
}

fn is_negative_zero(s: &str) -> bool {
    s.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b == b'0'))
}

/// An optionally signed, non-empty run of ASCII digits.
pub fn is_integer_literal(s: &str) -> bool {
    let digits = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Check the `revision` file: it must exist and hold an integer.
pub fn check_revision_file(ledger: &mut Ledger, source: &dyn CharmSource) {
    let rel = Path::new(REVISION_FILE);
    if !source.exists(rel) {
        ledger.error("revision file in root of charm is required");
        return;
    }

    match source.read_text(rel) {
        Ok(text) => {
            if !is_integer_literal(text.trim()) {
                ledger.error("revision file contains non-numeric data");
            }
        }
        Err(e) => ledger.error(format!("error while opening {REVISION_FILE} ({e})")),
    }
}
