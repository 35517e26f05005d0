//! # Relation Consistency Checker
//!
//! Validates one relation group (`provides`, `requires` or `peers`): the
//! shape of each relation entry, leftover scaffolding names, and whether
//! the relation has any lifecycle hook on disk.
//!
//! Charm-level policy (for example "every charm provides something")
//! belongs to the metadata validator, not here.

use serde_json::{Map, Value};

use proof_core::descriptor::display_value;
use proof_core::Ledger;

use crate::hooks::{HookRequirement, HookScanner};

/// Fields a relation entry may carry.
pub const KNOWN_RELATION_KEYS: &[&str] = &["interface", "scope", "limit", "optional"];

/// Valid values of a relation's `scope`.
pub const KNOWN_SCOPES: &[&str] = &["global", "container"];

/// Scope that binds a subordinate to its principal.
pub const CONTAINER_SCOPE: &str = "container";

/// Interface name used by the charm scaffolding template.
pub const TEMPLATE_INTERFACE: &str = "interface-name";

/// Relation name used by the charm scaffolding template.
pub const TEMPLATE_RELATION: &str = "relation-name";

/// Hook name suffixes that implement a relation, `<relation>-<suffix>`.
pub const RELATION_HOOK_SUFFIXES: &[&str] = &[
    "relation-changed",
    "relation-departed",
    "relation-joined",
    "relation-broken",
];

/// The three descriptor sections that declare relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationGroup {
    /// Relations this charm offers to others.
    Provides,
    /// Relations this charm consumes.
    Requires,
    /// Relations between units of this charm.
    Peers,
}

impl RelationGroup {
    /// Descriptor key of this group.
    pub fn key(self) -> &'static str {
        match self {
            Self::Provides => "provides",
            Self::Requires => "requires",
            Self::Peers => "peers",
        }
    }
}

/// Check every relation in a group.
///
/// `relations` is the raw descriptor value of the group. A null value is
/// an empty group.
pub fn check_group(
    ledger: &mut Ledger,
    hooks: &HookScanner<'_>,
    group: RelationGroup,
    relations: &Value,
    subordinate: bool,
) {
    let entries = match relations {
        Value::Null => return,
        Value::Object(map) => map,
        _ => {
            ledger.error(format!("{} must be a map of relations", group.key()));
            return;
        }
    };

    tracing::debug!(group = group.key(), count = entries.len(), "checking relation group");
    for (name, body) in entries {
        check_relation(ledger, hooks, name, body, subordinate);
    }
}

fn check_relation(
    ledger: &mut Ledger,
    hooks: &HookScanner<'_>,
    name: &str,
    body: &Value,
    subordinate: bool,
) {
    match body.as_object() {
        Some(fields) => check_relation_fields(ledger, name, fields),
        None => ledger.error(format!("relation {name} is not a map")),
    }

    if name == TEMPLATE_RELATION {
        ledger.error(format!(
            "template relations should be renamed to fit charm: {name}"
        ));
    }

    let mut has_hook = false;
    for suffix in RELATION_HOOK_SUFFIXES {
        has_hook |= hooks.check(ledger, &format!("{name}-{suffix}"), HookRequirement::Optional);
    }

    if !has_hook && !subordinate {
        ledger.info(format!("relation {name} has no hooks"));
    }
}

fn check_relation_fields(ledger: &mut Ledger, name: &str, fields: &Map<String, Value>) {
    if let Some(scope) = fields.get("scope") {
        let known = scope.as_str().is_some_and(|s| KNOWN_SCOPES.contains(&s));
        if !known {
            ledger.error(format!(
                "Unknown scope found in relation {name} - ({})",
                display_value(scope)
            ));
        }
    }

    match fields.get("interface") {
        Some(Value::String(interface)) => {
            if interface == TEMPLATE_INTERFACE {
                ledger.error(format!(
                    "template interface names should be changed: {interface}"
                ));
            }
        }
        Some(_) => ledger.error(format!("relation {name} interface must be a string")),
        None => ledger.error(format!("relation {name} missing interface")),
    }

    for key in fields.keys() {
        if !KNOWN_RELATION_KEYS.contains(&key.as_str()) {
            ledger.error(format!("Unknown relation field in relation {name} - ({key})"));
        }
    }
}

/// Whether a `requires` group contains a relation with `scope: container`.
///
/// An absent or malformed group has none.
pub fn has_container_scope(requires: Option<&Value>) -> bool {
    requires
        .and_then(Value::as_object)
        .is_some_and(|entries| {
            entries.values().any(|body| {
                body.get("scope").and_then(Value::as_str) == Some(CONTAINER_SCOPE)
            })
        })
}
