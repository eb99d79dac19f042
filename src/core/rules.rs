//! # Rule Definitions
//!
//! Every rule utr knows about. Each [`RuleId`] builds exactly one [`Rule`]; the order in which
//! they are checked lives in [`registry`](super::registry).

use crate::{
    constants::{JUSTFILE_NAMES, MAKEFILE},
    core::{heuristics::PYTEST, rule::Rule, snapshot::Snapshot},
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A recipe header: optional `@` (quiet), the name, then `:` or parameters.
    static ref JUST_TEST_RECIPE_RE: Regex =
        Regex::new(r"^@?test(:| )").expect("recipe pattern is valid");
}

const TEST_RECIPE: &str = "test";
const GO_MOD: &str = "go.mod";
const GO_TEST_SUFFIX: &str = "_test.go";

/// Identifies a rule independently of where it sits in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    Justfile,
    Exercism,
    Makefile,
    AdventOfCode,
    UvPytest,
    PdmPytest,
    PoetryPytest,
    Pytest,
    Django,
    Python,
    GoMulti,
    GoSingle,
    Elixir,
    Rust,
    Clojure,
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl RuleId {
    /// Every rule id, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Justfile,
        Self::Exercism,
        Self::Makefile,
        Self::AdventOfCode,
        Self::UvPytest,
        Self::PdmPytest,
        Self::PoetryPytest,
        Self::Pytest,
        Self::Django,
        Self::Python,
        Self::GoMulti,
        Self::GoSingle,
        Self::Elixir,
        Self::Rust,
        Self::Clojure,
        Self::Npm,
        Self::Yarn,
        Self::Pnpm,
        Self::Bun,
    ];

    /// Builds the rule this id stands for.
    pub fn build(self) -> Rule {
        match self {
            Self::Justfile => Rule::custom(
                self,
                "justfile",
                matches_justfile,
                "just test",
                format!(
                    "looking for: any of {JUSTFILE_NAMES:?} and a \"test\" or \"@test\" recipe"
                ),
            ),
            Self::Exercism => Rule::single_file(self, "exercism", ".exercism", "exercism test --"),
            Self::Makefile => Rule::custom(
                self,
                "makefile",
                matches_makefile,
                "make test",
                "looking for: a \"Makefile\" and a \"test:\" line",
            ),
            Self::AdventOfCode => Rule::single_file(self, "advent of code", "advent", "./advent"),
            Self::UvPytest => Rule::dependency_with_lockfile(self, "uv", "uv.lock", &PYTEST),
            Self::PdmPytest => Rule::dependency_with_lockfile(self, "pdm", "pdm.lock", &PYTEST),
            Self::PoetryPytest => {
                Rule::dependency_with_lockfile(self, "poetry", "poetry.lock", &PYTEST)
            }
            Self::Pytest => Rule::dependency(self, &PYTEST),
            Self::Django => Rule::single_file(self, "django", "manage.py", "./manage.py test"),
            Self::Python => Rule::any_of_files(
                self,
                "py",
                &[
                    "pyproject.toml",
                    "setup.py",
                    "tox.ini",
                    "setup.cfg",
                    "requirements.txt",
                    ".venv",
                    "venv",
                ],
                "python -m unittest",
            ),
            Self::GoMulti => Rule::custom(
                self,
                "go_multi",
                matches_go_multi,
                "go test ./...",
                "looking for: \"go.mod\" and no arguments",
            ),
            Self::GoSingle => Rule::custom(
                self,
                "go_single",
                matches_go_single,
                "go test",
                "looking for: \"go.mod\" or a file named \"..._test.go\"",
            ),
            Self::Elixir => Rule::single_file(self, "elixir", "mix.exs", "mix test"),
            Self::Rust => Rule::single_file(self, "rust", "Cargo.toml", "cargo test"),
            Self::Clojure => Rule::single_file(self, "clojure", "project.clj", "lein test"),
            Self::Npm => Rule::script_and_lockfile(self, "npm", "package-lock.json"),
            Self::Yarn => Rule::script_and_lockfile(self, "yarn", "yarn.lock"),
            Self::Pnpm => Rule::script_and_lockfile(self, "pnpm", "pnpm-lock.yaml"),
            // bun runs its own test runner, so no `scripts.test` is needed.
            Self::Bun => Rule::single_file(self, "bun", "bun.lockb", "bun test"),
        }
    }
}

/// A justfile with a `test` recipe.
///
/// `just` itself is asked first, since it understands every justfile feature. If it is not
/// installed, fails, or times out, the files are scanned for a recipe header instead and
/// `just` is left to report any real problem when the command runs.
fn matches_justfile(snapshot: &Snapshot) -> bool {
    // Justfile names are case-insensitive; only the common spellings are checked.
    if !snapshot.has_any_files(&JUSTFILE_NAMES) {
        return false;
    }

    match snapshot.recipe_inspector().recipe_names(snapshot.cwd()) {
        // A working `just` is authoritative: no `test` recipe means no match, no text scan.
        Ok(recipes) => recipes.contains(TEST_RECIPE),
        Err(e) => {
            log::debug!("Falling back to scanning the justfile: {}", e);
            snapshot.debug(&format!("{e}; scanning the file instead"), 6);
            JUSTFILE_NAMES.iter().any(|name| {
                snapshot
                    .read_file(name)
                    .iter()
                    .any(|line| JUST_TEST_RECIPE_RE.is_match(line))
            })
        }
    }
}

fn matches_makefile(snapshot: &Snapshot) -> bool {
    snapshot.has_all_files(&[MAKEFILE])
        && snapshot
            .read_file(MAKEFILE)
            .iter()
            .any(|line| line.starts_with("test:"))
}

/// Modules with nested packages run no tests with a bare `go test`, so `./...` is needed.
/// A user-supplied filter makes the wildcard invalid, though.
fn matches_go_multi(snapshot: &Snapshot) -> bool {
    snapshot.has_all_files(&[GO_MOD]) && snapshot.args().is_empty()
}

/// In a package root with a test file, a bare `go test` is enough.
fn matches_go_single(snapshot: &Snapshot) -> bool {
    snapshot.has_all_files(&[GO_MOD])
        || snapshot
            .filenames()
            .iter()
            .any(|name| name.ends_with(GO_TEST_SUFFIX))
}
