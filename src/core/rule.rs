//! # Rule
//!
//! A rule pairs a total predicate over a [`Snapshot`] with the test command to run when it
//! holds. Most rules follow one of a few shapes (a marker file, any of several files, a JS
//! lockfile with a `test` script, a dependency heuristic), which [`Matcher`] captures as data.
//! Anything else is a [`Matcher::Custom`] function.

use crate::core::{heuristics::DependencyProbe, rules::RuleId, snapshot::Snapshot};
use std::fmt;

/// A bespoke predicate. It must never panic: every failure inside it means `false`
/// (or a documented fallback).
pub type Predicate = fn(&Snapshot) -> bool;

/// How a rule decides whether it applies.
#[derive(Clone, Copy)]
pub enum Matcher {
    /// One marker file is present.
    File(&'static str),
    /// At least one of the files is present.
    AnyFile(&'static [&'static str]),
    /// `package.json` has a truthy `scripts.test` and the lockfile is present.
    ScriptAndLockfile(&'static str),
    /// The lockfile is present and the dependency heuristic holds.
    LockfileAndDependency {
        lockfile: &'static str,
        probe: &'static DependencyProbe,
    },
    /// The dependency heuristic holds.
    Dependency(&'static DependencyProbe),
    /// Anything else.
    Custom(Predicate),
}

impl Matcher {
    /// Evaluates the matcher against `snapshot`.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        match self {
            Self::File(file) => snapshot.has_all_files(&[*file]),
            Self::AnyFile(files) => snapshot.has_any_files(files),
            Self::ScriptAndLockfile(lockfile) => snapshot.has_test_script_and_lockfile(lockfile),
            Self::LockfileAndDependency { lockfile, probe } => {
                snapshot.has_all_files(&[*lockfile]) && probe.matches(snapshot)
            }
            Self::Dependency(probe) => probe.matches(snapshot),
            Self::Custom(predicate) => predicate(snapshot),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
            Self::AnyFile(files) => f.debug_tuple("AnyFile").field(files).finish(),
            Self::ScriptAndLockfile(lockfile) => {
                f.debug_tuple("ScriptAndLockfile").field(lockfile).finish()
            }
            Self::LockfileAndDependency { lockfile, probe } => f
                .debug_struct("LockfileAndDependency")
                .field("lockfile", lockfile)
                .field("package", &probe.package)
                .finish(),
            Self::Dependency(probe) => f.debug_tuple("Dependency").field(&probe.package).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named predicate plus the command it selects.
///
/// Two rules are equal when they have the same [`RuleId`].
#[derive(Debug, Clone)]
pub struct Rule {
    id: RuleId,
    name: String,
    matcher: Matcher,
    command: String,
    debug_text: String,
}

impl Rule {
    /// A rule with a bespoke predicate and explanation.
    pub fn custom(
        id: RuleId,
        name: impl Into<String>,
        predicate: Predicate,
        command: impl Into<String>,
        debug_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            matcher: Matcher::Custom(predicate),
            command: command.into(),
            debug_text: debug_text.into(),
        }
    }

    /// Runs `command` if `file` is in the listing.
    pub fn single_file(id: RuleId, name: &str, file: &'static str, command: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            matcher: Matcher::File(file),
            command: command.to_string(),
            debug_text: format!("looking for: \"{file}\""),
        }
    }

    /// Runs `command` if any of `files` is in the listing.
    pub fn any_of_files(
        id: RuleId,
        name: &str,
        files: &'static [&'static str],
        command: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            matcher: Matcher::AnyFile(files),
            command: command.to_string(),
            debug_text: format!("looking for any of: {files:?}"),
        }
    }

    /// Runs `<manager> test` if `package.json` defines a test script and `lockfile` is present.
    pub fn script_and_lockfile(id: RuleId, manager: &str, lockfile: &'static str) -> Self {
        Self {
            id,
            name: manager.to_string(),
            matcher: Matcher::ScriptAndLockfile(lockfile),
            command: format!("{manager} test"),
            debug_text: format!(
                "looking for: \"package.json\", a \"scripts.test\" property, and a \"{lockfile}\""
            ),
        }
    }

    /// Runs the probed package directly (it is expected on the `PATH`).
    pub fn dependency(id: RuleId, probe: &'static DependencyProbe) -> Self {
        Self {
            id,
            name: probe.package.to_string(),
            matcher: Matcher::Dependency(probe),
            command: probe.package.to_string(),
            debug_text: probe.describe(),
        }
    }

    /// Runs the probed package through a project manager (`uv run pytest`), which works
    /// outside an activated environment. Requires the manager's `<manager>.lock`.
    ///
    /// A dependency declared for one manager next to another manager's lockfile also
    /// matches; that mix is rare enough to accept.
    pub fn dependency_with_lockfile(
        id: RuleId,
        manager: &str,
        lockfile: &'static str,
        probe: &'static DependencyProbe,
    ) -> Self {
        Self {
            id,
            name: format!("{}-{manager}", probe.package),
            matcher: Matcher::LockfileAndDependency { lockfile, probe },
            command: format!("{manager} run {}", probe.package),
            debug_text: format!(
                "looking for: a {} cache / dependency, plus a \"{lockfile}\"",
                probe.package
            ),
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> Matcher {
        self.matcher
    }

    /// The command exactly as it would be shown to a user.
    pub fn command_line(&self) -> &str {
        &self.command
    }

    /// The command split into program and arguments.
    pub fn command_template(&self) -> Vec<String> {
        self.command.split_whitespace().map(str::to_string).collect()
    }

    /// What the rule looks for, in words.
    pub fn debug_text(&self) -> &str {
        &self.debug_text
    }

    /// True if the rule applies to `snapshot`.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.matcher.matches(snapshot)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Rule {}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::heuristics::PYTEST;

    fn never(_: &Snapshot) -> bool {
        false
    }

    #[test]
    fn test_single_file_builder() {
        let rule = Rule::single_file(RuleId::Rust, "rust", "Cargo.toml", "cargo test");
        assert_eq!(rule.command_template(), vec!["cargo", "test"]);
        assert_eq!(rule.debug_text(), "looking for: \"Cargo.toml\"");

        assert!(rule.matches(&Snapshot::from_parts("/", ["Cargo.toml"], vec![], false)));
        assert!(!rule.matches(&Snapshot::from_parts("/", ["cargo.toml"], vec![], false)));
    }

    #[test]
    fn test_any_of_files_builder() {
        let rule =
            Rule::any_of_files(RuleId::Python, "py", &["setup.py", "venv"], "python -m unittest");
        assert_eq!(rule.debug_text(), "looking for any of: [\"setup.py\", \"venv\"]");
        assert!(rule.matches(&Snapshot::from_parts("/", ["venv", "x"], vec![], false)));
        assert!(!rule.matches(&Snapshot::from_parts("/", ["x"], vec![], false)));
    }

    #[test]
    fn test_script_and_lockfile_builder() {
        let rule = Rule::script_and_lockfile(RuleId::Pnpm, "pnpm", "pnpm-lock.yaml");
        assert_eq!(rule.name(), "pnpm");
        assert_eq!(rule.command_template(), vec!["pnpm", "test"]);
        assert!(rule.debug_text().contains("\"pnpm-lock.yaml\""));
    }

    #[test]
    fn test_dependency_with_lockfile_builder() {
        let rule = Rule::dependency_with_lockfile(RuleId::UvPytest, "uv", "uv.lock", &PYTEST);
        assert_eq!(rule.name(), "pytest-uv");
        assert_eq!(rule.command_template(), vec!["uv", "run", "pytest"]);

        assert!(rule.matches(&Snapshot::from_parts("/", ["uv.lock", "pytest.ini"], vec![], false)));
        assert!(!rule.matches(&Snapshot::from_parts("/", ["pytest.ini"], vec![], false)));
        assert!(!rule.matches(&Snapshot::from_parts("/", ["uv.lock"], vec![], false)));
    }

    #[test]
    fn test_rules_compare_by_id() {
        let a = Rule::custom(RuleId::GoMulti, "a", never, "x", "");
        let b = Rule::custom(RuleId::GoMulti, "b", never, "y", "");
        let c = Rule::custom(RuleId::GoSingle, "a", never, "x", "");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "<Rule a>");
    }
}
