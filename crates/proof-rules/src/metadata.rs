//! # Metadata Schema Validator
//!
//! Descriptor-level policy. Runs the checks below in order; the order
//! only affects the order of findings, never the verdict.
//!
//! 1. Unknown top-level keys.
//! 2. `name` matches the charm directory.
//! 3. `summary` length.
//! 4. `maintainer` presence and formatting.
//! 5. `hooks/` directory exists.
//! 6. `copyright` file exists.
//! 7. README discovery and boilerplate detection.
//! 8. `subordinate` is a boolean.
//! 9. `provides` (every principal charm provides something).
//! 10. `requires` (subordinates need a container-scoped relation).
//! 11. `peers`.
//! 12. Deprecated `revision` field.
//! 13. Required, recommended and optional lifecycle hooks.

use std::path::Path;

use serde_json::Value;

use proof_core::descriptor::display_value;
use proof_core::{CharmDescriptor, CharmSource, Ledger};

use crate::boilerplate::README_TEMPLATE_NAME;
use crate::config::ReadmeTemplate;
use crate::hooks::{HookRequirement, HookScanner, HOOKS_DIR};
use crate::maintainer;
use crate::relations::{self, RelationGroup};
use crate::revision;

/// Top-level descriptor fields that are recognized.
pub const KNOWN_METADATA_KEYS: &[&str] = &[
    "name",
    "summary",
    "maintainer",
    "description",
    "subordinate",
    "provides",
    "requires",
    "peers",
    "format",
    "revision",
];

/// Longest summary that does not draw a warning.
pub const SUMMARY_MAX_LEN: usize = 72;

/// License file required at the charm root.
pub const COPYRIGHT_FILE: &str = "copyright";

/// Lifecycle hooks every charm is checked for.
pub const LIFECYCLE_HOOKS: &[(&str, HookRequirement)] = &[
    ("install", HookRequirement::Required),
    ("start", HookRequirement::Recommended),
    ("stop", HookRequirement::Recommended),
    ("config-changed", HookRequirement::Optional),
];

/// Validates one parsed descriptor against the charm on disk.
pub struct MetadataValidator<'a> {
    source: &'a dyn CharmSource,
    hooks: &'a HookScanner<'a>,
    template: &'a ReadmeTemplate,
}

impl<'a> MetadataValidator<'a> {
    /// Create a validator for the charm in `source`, checking hooks with
    /// `hooks` and README files against `template`.
    pub fn new(
        source: &'a dyn CharmSource,
        hooks: &'a HookScanner<'a>,
        template: &'a ReadmeTemplate,
    ) -> Self {
        Self {
            source,
            hooks,
            template,
        }
    }

    /// Run every descriptor-level check, recording findings in `ledger`.
    pub fn validate(&self, ledger: &mut Ledger, descriptor: &CharmDescriptor) {
        check_unknown_keys(ledger, descriptor);
        self.check_name(ledger, descriptor);
        check_summary(ledger, descriptor);
        check_maintainer(ledger, descriptor);

        if !self.source.is_dir(Path::new(HOOKS_DIR)) {
            ledger.error("no hooks directory");
        }
        if !self.source.exists(Path::new(COPYRIGHT_FILE)) {
            ledger.error("no copyright file");
        }
        self.check_readmes(ledger);

        let subordinate = check_subordinate(ledger, descriptor);
        self.check_relations(ledger, descriptor, subordinate);
        check_descriptor_revision(ledger, descriptor);

        for (hook, requirement) in LIFECYCLE_HOOKS {
            self.hooks.check(ledger, hook, *requirement);
        }
    }

    fn check_name(&self, ledger: &mut Ledger, descriptor: &CharmDescriptor) {
        let Some(value) = descriptor.get("name") else {
            ledger.error("missing required field: name");
            return;
        };
        let name = display_value(value);
        let dir_name = self.source.base_name();
        if name != dir_name {
            ledger.warn(format!(
                "metadata name ({name}) must match directory name ({dir_name}) exactly for local deployment."
            ));
        }
    }

    fn check_readmes(&self, ledger: &mut Ledger) {
        let entries = match self.source.list_root() {
            Ok(entries) => entries,
            Err(e) => {
                ledger.error(format!("cannot list charm directory ({e})"));
                return;
            }
        };
        let readmes: Vec<String> = entries
            .into_iter()
            .filter(|name| name.to_uppercase().contains("README"))
            .collect();

        if readmes.is_empty() {
            ledger.warn("no README file");
            return;
        }
        if readmes.iter().any(|name| name == README_TEMPLATE_NAME) {
            ledger.error(format!("Includes template {README_TEMPLATE_NAME} file"));
        }

        let detector = match self.template {
            ReadmeTemplate::Loaded(detector) => detector,
            ReadmeTemplate::Unavailable { path, reason } => {
                ledger.error(format!("error while opening {} ({reason})", path.display()));
                return;
            }
        };
        for name in &readmes {
            match self.source.read_text(Path::new(name)) {
                Ok(text) => {
                    detector.scan(ledger, &text, name);
                }
                Err(e) => ledger.error(format!("error while opening {name} ({e})")),
            }
        }
    }

    fn check_relations(&self, ledger: &mut Ledger, descriptor: &CharmDescriptor, subordinate: bool) {
        match descriptor.get(RelationGroup::Provides.key()) {
            Some(provides) => {
                relations::check_group(ledger, self.hooks, RelationGroup::Provides, provides, subordinate)
            }
            None if !subordinate => ledger.warn("all charms should provide at least one thing"),
            None => {}
        }

        let requires = descriptor.get(RelationGroup::Requires.key());
        if subordinate {
            if !relations::has_container_scope(requires) {
                ledger.error("subordinates must have at least one scope: container relation");
            }
        } else if let Some(requires) = requires {
            relations::check_group(ledger, self.hooks, RelationGroup::Requires, requires, subordinate);
        }

        if let Some(peers) = descriptor.get(RelationGroup::Peers.key()) {
            relations::check_group(ledger, self.hooks, RelationGroup::Peers, peers, subordinate);
        }
    }
}

fn check_unknown_keys(ledger: &mut Ledger, descriptor: &CharmDescriptor) {
    for key in descriptor.keys() {
        if !KNOWN_METADATA_KEYS.contains(&key) {
            ledger.error(format!("Unknown root metadata field ({key})"));
        }
    }
}

fn check_summary(ledger: &mut Ledger, descriptor: &CharmDescriptor) {
    match descriptor.get("summary") {
        None => ledger.error("missing required field: summary"),
        Some(Value::String(summary)) => {
            if summary.chars().count() > SUMMARY_MAX_LEN {
                ledger.warn(format!("summary should be less than {SUMMARY_MAX_LEN}"));
            }
        }
        Some(_) => ledger.error("summary must be a string"),
    }
}

fn check_maintainer(ledger: &mut Ledger, descriptor: &CharmDescriptor) {
    let Some(value) = descriptor.get("maintainer") else {
        ledger.error("Charms need a maintainer (See RFC2822) - Name <email>");
        return;
    };
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };
    for entry in entries {
        let outcome = match entry {
            Value::String(s) => maintainer::canonicalize(s),
            other => Err(display_value(other)),
        };
        if let Err(formatted) = outcome {
            ledger.warn(format!(
                "Maintainer address should contain a real-name and email only. [{formatted}]"
            ));
        }
    }
}

/// Returns the effective subordinate flag.
fn check_subordinate(ledger: &mut Ledger, descriptor: &CharmDescriptor) -> bool {
    match descriptor.get("subordinate") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            ledger.error("subordinate must be a boolean value");
            false
        }
    }
}

fn check_descriptor_revision(ledger: &mut Ledger, descriptor: &CharmDescriptor) {
    if let Some(value) = descriptor.get("revision") {
        ledger.warn(
            "Revision should not be stored in metadata.yaml anymore. Move it to the revision file",
        );
        if !revision::is_non_negative_revision(value) {
            ledger.warn("revision should be a positive integer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boilerplate::BoilerplateDetector;
    use crate::hooks::builtin_rules;
    use proof_core::{LocalCharm, Severity, STATUS_CLEAN, STATUS_ERROR, STATUS_WARNING};

    /// A throw-away charm directory named `foo` with everything a clean
    /// charm needs except the descriptor.
    struct Charm {
        _tmp: tempfile::TempDir,
        root: std::path::PathBuf,
    }

    impl Charm {
        fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let root = tmp.path().join("foo");
            std::fs::create_dir_all(root.join(HOOKS_DIR)).unwrap();
            std::fs::write(root.join(COPYRIGHT_FILE), "GPL-3\n").unwrap();
            std::fs::write(root.join("README.md"), "# foo\nDeploys foo.\n").unwrap();
            let charm = Self { _tmp: tmp, root };
            for hook in ["install", "start", "stop"] {
                charm.hook(hook);
            }
            charm
        }

        fn hook(&self, name: &str) {
            let path = self.root.join(HOOKS_DIR).join(name);
            std::fs::write(&path, "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            }
        }

        fn validate(&self, yaml: &str) -> Ledger {
            self.validate_with(yaml, &ReadmeTemplate::Loaded(BoilerplateDetector::bundled()))
        }

        fn validate_with(&self, yaml: &str, template: &ReadmeTemplate) -> Ledger {
            let source = LocalCharm::new(&self.root);
            let rules = builtin_rules().unwrap();
            let hooks = HookScanner::new(&source, &rules);
            let descriptor = CharmDescriptor::parse(yaml, Path::new("metadata.yaml")).unwrap();
            let mut ledger = Ledger::new();
            MetadataValidator::new(&source, &hooks, template).validate(&mut ledger, &descriptor);
            ledger
        }
    }

    /// A charm whose root cannot be listed.
    struct Unlistable(LocalCharm);

    impl CharmSource for Unlistable {
        fn root(&self) -> &Path {
            self.0.root()
        }
        fn exists(&self, rel: &Path) -> bool {
            self.0.exists(rel)
        }
        fn is_dir(&self, rel: &Path) -> bool {
            self.0.is_dir(rel)
        }
        fn list_root(&self) -> std::io::Result<Vec<String>> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ))
        }
        fn is_owner_executable(&self, rel: &Path) -> std::io::Result<bool> {
            self.0.is_owner_executable(rel)
        }
        fn read_text(&self, rel: &Path) -> std::io::Result<String> {
            self.0.read_text(rel)
        }
    }

    const BASE: &str = "name: foo\nsummary: does a thing\nmaintainer: A Dev <a@b.com>\n";

    fn with_provides(extra: &str) -> String {
        format!("{BASE}provides:\n  website:\n    interface: http\n{extra}")
    }

    fn messages(ledger: &Ledger) -> Vec<String> {
        ledger.findings().iter().map(|f| f.message.clone()).collect()
    }

    #[test]
    fn clean_descriptor() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let ledger = charm.validate(&with_provides(""));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));
        assert_eq!(ledger.status(), STATUS_CLEAN);
    }

    #[test]
    fn unknown_top_level_keys_one_error_each() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let ledger = charm.validate(&with_provides("colour: blue\nextra: 1\n"));
        assert_eq!(
            messages(&ledger),
            vec![
                "Unknown root metadata field (colour)",
                "Unknown root metadata field (extra)",
            ]
        );
    }

    #[test]
    fn name_mismatch_is_single_warning() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let yaml = with_provides("").replace("name: foo", "name: bar");
        let ledger = charm.validate(&yaml);
        assert_eq!(
            messages(&ledger),
            vec!["metadata name (bar) must match directory name (foo) exactly for local deployment."]
        );
        assert_eq!(ledger.status(), STATUS_WARNING);
    }

    #[test]
    fn long_summary_warns() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let long = "x".repeat(SUMMARY_MAX_LEN + 1);
        let yaml = with_provides("").replace("does a thing", &long);
        let ledger = charm.validate(&yaml);
        assert_eq!(messages(&ledger), vec!["summary should be less than 72"]);

        let exact = "y".repeat(SUMMARY_MAX_LEN);
        let yaml = with_provides("").replace("does a thing", &exact);
        assert!(charm.validate(&yaml).findings().is_empty());
    }

    #[test]
    fn missing_required_fields() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let ledger = charm.validate(
            "maintainer: A Dev <a@b.com>\nprovides:\n  website:\n    interface: http\n",
        );
        assert_eq!(
            messages(&ledger),
            vec![
                "missing required field: name",
                "missing required field: summary",
            ]
        );
    }

    #[test]
    fn missing_maintainer_is_exactly_one_error() {
        let charm = Charm::new();
        let ledger = charm.validate("name: foo\nsummary: s\n");
        let maintainer_errors: Vec<_> = ledger
            .findings()
            .iter()
            .filter(|f| f.severity == Severity::Error && f.message.contains("maintainer"))
            .collect();
        assert_eq!(maintainer_errors.len(), 1);
    }

    #[test]
    fn maintainer_list_warns_per_bad_entry() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let yaml = with_provides("").replace(
            "maintainer: A Dev <a@b.com>\n",
            "maintainer:\n  - A Dev <a@b.com>\n  - B.  Dev <b@c.com>\n  - 42\n",
        );
        let ledger = charm.validate(&yaml);
        assert_eq!(
            messages(&ledger),
            vec![
                "Maintainer address should contain a real-name and email only. [\"B. Dev\" <b@c.com>]",
                "Maintainer address should contain a real-name and email only. [42]",
            ]
        );
    }

    #[test]
    fn missing_hooks_dir_and_copyright() {
        let charm = Charm::new();
        std::fs::remove_dir_all(charm.root.join(HOOKS_DIR)).unwrap();
        std::fs::remove_file(charm.root.join(COPYRIGHT_FILE)).unwrap();
        let ledger = charm.validate(&with_provides(""));
        let msgs = messages(&ledger);
        assert!(msgs.contains(&"no hooks directory".to_string()));
        assert!(msgs.contains(&"no copyright file".to_string()));
        assert!(msgs.contains(&"missing hook install".to_string()));
        assert_eq!(ledger.status(), STATUS_ERROR);
    }

    #[test]
    fn no_readme_warns() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        std::fs::remove_file(charm.root.join("README.md")).unwrap();
        let ledger = charm.validate(&with_provides(""));
        assert_eq!(messages(&ledger), vec!["no README file"]);
    }

    #[test]
    fn readme_detection_is_case_insensitive() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        std::fs::remove_file(charm.root.join("README.md")).unwrap();
        std::fs::write(charm.root.join("readme.txt"), "foo\n").unwrap();
        let ledger = charm.validate(&with_provides(""));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));
    }

    #[test]
    fn unlistable_root_is_an_error() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let source = Unlistable(LocalCharm::new(&charm.root));
        let rules = builtin_rules().unwrap();
        let hooks = HookScanner::new(&source, &rules);
        let template = ReadmeTemplate::Loaded(BoilerplateDetector::bundled());
        let descriptor =
            CharmDescriptor::parse(&with_provides(""), Path::new("metadata.yaml")).unwrap();
        let mut ledger = Ledger::new();
        MetadataValidator::new(&source, &hooks, &template).validate(&mut ledger, &descriptor);
        assert_eq!(
            messages(&ledger),
            vec!["cannot list charm directory (permission denied)"]
        );
        assert_eq!(ledger.status(), STATUS_ERROR);
    }

    #[test]
    fn template_readme_left_in_place() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        std::fs::write(charm.root.join("README.ex"), "placeholder\n").unwrap();
        let ledger = charm.validate(&with_provides(""));
        assert_eq!(messages(&ledger), vec!["Includes template README.ex file"]);
    }

    #[test]
    fn boilerplate_in_readme() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let detector = BoilerplateDetector::bundled();
        let copied = format!("# foo\n{}\n", detector.significant_lines()[1]);
        std::fs::write(charm.root.join("README.md"), copied).unwrap();
        let ledger = charm.validate(&with_provides(""));
        assert_eq!(
            messages(&ledger),
            vec!["README.md Includes boilerplate README.ex line 2"]
        );
    }

    #[test]
    fn unavailable_template_is_reported_once() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        std::fs::write(charm.root.join("README"), "x\n").unwrap();
        let template = ReadmeTemplate::Unavailable {
            path: "/opt/templates/README.ex".into(),
            reason: "No such file or directory".to_string(),
        };
        let ledger = charm.validate_with(&with_provides(""), &template);
        assert_eq!(
            messages(&ledger),
            vec!["error while opening /opt/templates/README.ex (No such file or directory)"]
        );
    }

    #[test]
    fn subordinate_must_be_boolean() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let ledger = charm.validate(&with_provides("subordinate: maybe\n"));
        assert_eq!(messages(&ledger), vec!["subordinate must be a boolean value"]);
    }

    #[test]
    fn principal_without_provides_warns() {
        let charm = Charm::new();
        let ledger = charm.validate(BASE);
        assert_eq!(
            messages(&ledger),
            vec!["all charms should provide at least one thing"]
        );
    }

    #[test]
    fn explicit_empty_provides_suppresses_warning() {
        let charm = Charm::new();
        let ledger = charm.validate(&format!("{BASE}provides: {{}}\n"));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));

        let ledger = charm.validate(&format!("{BASE}provides:\n"));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));
    }

    #[test]
    fn subordinate_without_requires() {
        let charm = Charm::new();
        let ledger = charm.validate(&format!("{BASE}subordinate: true\n"));
        assert_eq!(
            messages(&ledger),
            vec!["subordinates must have at least one scope: container relation"]
        );
    }

    #[test]
    fn yaml11_subordinate_flag_is_honoured() {
        let charm = Charm::new();
        let ledger = charm.validate(&format!(
            "{BASE}subordinate: yes\nrequires:\n  host:\n    interface: juju-info\n    scope: container\n"
        ));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));
        assert_eq!(ledger.status(), STATUS_CLEAN);
    }

    #[test]
    fn subordinate_with_only_global_requires() {
        let charm = Charm::new();
        let ledger = charm.validate(&format!(
            "{BASE}subordinate: true\nrequires:\n  logs:\n    interface: syslog\n    scope: global\n"
        ));
        let container_errors = ledger
            .findings()
            .iter()
            .filter(|f| f.message.contains("container relation"))
            .count();
        assert_eq!(container_errors, 1);
    }

    #[test]
    fn subordinate_with_container_requires_is_clean() {
        let charm = Charm::new();
        let ledger = charm.validate(&format!(
            "{BASE}subordinate: true\nrequires:\n  host:\n    interface: juju-info\n    scope: container\n"
        ));
        assert!(ledger.findings().is_empty(), "{:?}", messages(&ledger));
    }

    #[test]
    fn requires_and_peers_are_checked_for_principals() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        charm.hook("cluster-relation-changed");
        let ledger = charm.validate(&with_provides(
            "requires:\n  db:\n    scope: global\npeers:\n  cluster:\n    interface: foo-peer\n",
        ));
        assert_eq!(
            messages(&ledger),
            vec!["relation db missing interface", "relation db has no hooks"]
        );
    }

    #[test]
    fn revision_in_descriptor() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        let ledger = charm.validate(&with_provides("revision: 3\n"));
        assert_eq!(
            messages(&ledger),
            vec!["Revision should not be stored in metadata.yaml anymore. Move it to the revision file"]
        );

        let ledger = charm.validate(&with_provides("revision: -2\n"));
        assert_eq!(ledger.count(Severity::Warning), 2);
        assert_eq!(
            ledger.findings()[1].message,
            "revision should be a positive integer"
        );
        assert_eq!(ledger.status(), STATUS_WARNING);
    }

    #[test]
    fn missing_recommended_and_required_hooks() {
        let charm = Charm::new();
        charm.hook("website-relation-joined");
        for hook in ["install", "start"] {
            std::fs::remove_file(charm.root.join(HOOKS_DIR).join(hook)).unwrap();
        }
        let ledger = charm.validate(&with_provides(""));
        assert_eq!(
            messages(&ledger),
            vec!["missing hook install", "missing recommended hook start"]
        );
    }
}
