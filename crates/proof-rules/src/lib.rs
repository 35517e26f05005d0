#![deny(missing_docs)]

//! # proof-rules — Charm Convention Rules
//!
//! The rule engine of charm-proof. Each module owns one family of checks
//! and reports into a shared [`Ledger`](proof_core::Ledger):
//!
//! - **Hooks** ([`hooks`]): presence by requirement class, executable bit,
//!   and hazard-pattern scanning of hook text.
//! - **Relations** ([`relations`]): shape of `provides`/`requires`/`peers`
//!   entries and whether each relation has a lifecycle hook.
//! - **Metadata** ([`metadata`]): descriptor-level policy, including
//!   maintainer formatting ([`maintainer`]) and README discovery.
//! - **Boilerplate** ([`boilerplate`]): README text copied from the
//!   scaffolding template.
//! - **Revision** ([`revision`]): the `revision` file and the deprecated
//!   descriptor field.
//! - **Audit** ([`audit`]): sequences all of the above for one charm.
//!
//! ## Crate Policy
//!
//! - Depends only on `proof-core` internally.
//! - Rules observe the charm through [`CharmSource`](proof_core::CharmSource)
//!   and never modify it.
//! - A violation is a finding, never an `Err`.

pub mod audit;
pub mod boilerplate;
pub mod config;
pub mod hooks;
pub mod maintainer;
pub mod metadata;
pub mod relations;
pub mod revision;

pub use audit::{audit, Audit};
pub use boilerplate::BoilerplateDetector;
pub use config::{AuditConfig, HazardEntry, ReadmeTemplate};
pub use hooks::{HazardRule, HookRequirement, HookScanner};
pub use metadata::MetadataValidator;
pub use relations::RelationGroup;
