//! # Dependency Heuristics
//!
//! Decides whether a project uses a test framework by looking, from cheapest to most
//! expensive, at: a cache directory or dedicated ini file; a section header in a shared ini
//! file; a configuration block in `pyproject.toml`; and finally every place the popular
//! Python project managers record (dev) dependencies. When no structured parser is available
//! the raw text of `pyproject.toml` is searched instead.
//!
//! The verdict is memoized on the snapshot, since several rules ask the same question.

use crate::{
    constants::PYPROJECT_TOML,
    core::{
        lookup::dig,
        snapshot::Snapshot,
        structured::StructuredConfig,
    },
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A quoted requirement such as "pytest", "pytest>=8" or "pytest ==7".
    static ref PYTEST_REQUIREMENT_RE: Regex =
        Regex::new(r#""pytest ?[<=>]?"#).expect("requirement pattern is valid");
}

fn pytest_requirement() -> &'static Regex {
    &PYTEST_REQUIREMENT_RE
}

/// Where a package can show up in a project that uses it for testing.
#[derive(Debug)]
pub struct DependencyProbe {
    /// Dependency names matching this prefix count (`pytest`, `pytest-mock`, `pytest==8`).
    pub package: &'static str,
    /// Files or directories whose mere presence is enough.
    pub marker_files: &'static [&'static str],
    /// `(file, line)` pairs: the file has a line exactly equal to `line`.
    pub ini_sections: &'static [(&'static str, &'static str)],
    /// Path of a configuration table inside `pyproject.toml`; a non-empty table counts.
    pub config_block: &'static [&'static str],
    /// Paths of string lists of requirement specifiers.
    pub dependency_lists: &'static [&'static [&'static str]],
    /// Paths of tables keyed by dependency name.
    pub dependency_tables: &'static [&'static [&'static str]],
    /// Matches a quoted requirement on the package in raw `pyproject.toml` text.
    pub requirement: fn() -> &'static Regex,
}

/// `pytest`, configured or declared anywhere pytest, pip, uv, poetry or pdm look.
pub static PYTEST: DependencyProbe = DependencyProbe {
    package: "pytest",
    marker_files: &[".pytest_cache", "pytest.ini"],
    ini_sections: &[("tox.ini", "[pytest]"), ("setup.cfg", "[tool:pytest]")],
    config_block: &["tool", "pytest", "ini_options"],
    dependency_lists: &[
        // PEP 735 groups; `dev` is uv's default group.
        &["dependency-groups", "test"],
        &["dependency-groups", "dev"],
        &["project", "optional-dependencies", "test"],
        &["project", "optional-dependencies", "tests"],
        &["project", "dependencies"],
        // uv (legacy)
        &["tool", "uv", "dev-dependencies"],
        // pdm
        &["tool", "pdm", "dev-dependencies", "test"],
    ],
    dependency_tables: &[
        // poetry
        &["tool", "poetry", "group", "test", "dependencies"],
        &["tool", "poetry", "group", "dev", "dependencies"],
    ],
    requirement: pytest_requirement,
};

impl DependencyProbe {
    /// True if the project appears to use the package. Memoized per snapshot.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        snapshot.memoize(self.package, |s| self.evaluate(s))
    }

    /// The explanation shown in the resolution trace.
    pub fn describe(&self) -> String {
        format!(
            "looking for: a \"{}\", {} configuration files, or a dependency on {} in \"{}\" (from any popular package manager)",
            self.marker_files.first().copied().unwrap_or(self.package),
            self.package,
            self.package,
            PYPROJECT_TOML
        )
    }

    fn names_package(&self, name: &str) -> bool {
        name.starts_with(self.package)
    }

    fn evaluate(&self, snapshot: &Snapshot) -> bool {
        if snapshot.has_any_files(self.marker_files) {
            return true;
        }

        for (file, header) in self.ini_sections {
            if snapshot.read_file(file).iter().any(|line| line == header) {
                return true;
            }
        }

        if !snapshot.has_all_files(&[PYPROJECT_TOML]) {
            return false;
        }

        match snapshot.read_structured_config(PYPROJECT_TOML) {
            StructuredConfig::Parsed(table) if !table.is_empty() => self.matches_pyproject(&table),
            // No parser, or nothing usable parsed: fall back to a best-effort text search.
            _ => self.matches_raw_text(&snapshot.load_file(PYPROJECT_TOML)),
        }
    }

    fn matches_pyproject(&self, pyproject: &toml::Table) -> bool {
        if !dig(pyproject, self.config_block, toml::Table::new()).is_empty() {
            return true;
        }

        let listed = self.dependency_lists.iter().any(|path| {
            dig(pyproject, path, Vec::<String>::new())
                .iter()
                .any(|dep| self.names_package(dep))
        });
        if listed {
            return true;
        }

        self.dependency_tables.iter().any(|path| {
            dig(pyproject, path, toml::Table::new())
                .keys()
                .any(|dep| self.names_package(dep))
        })
    }

    fn matches_raw_text(&self, contents: &str) -> bool {
        let block_header = format!("[{}]", self.config_block.join("."));
        if contents.contains(&block_header) {
            return true;
        }
        (self.requirement)().is_match(contents)
    }
}
