//! # Snapshot
//!
//! An immutable, per-invocation view of a project directory: its shallow file listing, the
//! arguments to forward, and whether resolution should be traced.
//!
//! File contents are read lazily and memoized on the snapshot itself. A file is read from
//! disk at most once per snapshot, and later reads return the cached text even if the file
//! has since changed or disappeared. Files that are not in the listing are never touched;
//! they read as empty.

use crate::{
    constants::{PACKAGE_JSON, TRACE_PREFIX},
    core::{
        lookup::{self, dig},
        recipes::{JustInspector, RecipeInspector},
        structured::{StructuredConfig, StructuredParser, TomlParser},
    },
};
use colored::Colorize;
use serde_json::Value as JsonValue;
use std::{
    cell::{OnceCell, RefCell},
    collections::{BTreeSet, HashMap},
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};
use thiserror::Error;

/// A parsed JSON object, as returned by [`Snapshot::read_json`].
pub type JsonMap = serde_json::Map<String, JsonValue>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Could not list directory '{path}': {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where trace lines go when a snapshot is debugging.
#[derive(Debug)]
pub enum TraceSink {
    /// Print every line to stdout.
    Stdout,
    /// Keep every line in memory (see [`Snapshot::trace_lines`]).
    Capture(RefCell<Vec<String>>),
}

/// Every content form of one file, derived from a single read.
#[derive(Debug)]
struct CachedFile {
    text: Rc<str>,
    json: OnceCell<Rc<JsonMap>>,
    structured: OnceCell<Rc<toml::Table>>,
}

impl CachedFile {
    fn new(text: String) -> Self {
        Self {
            text: Rc::from(text),
            json: OnceCell::new(),
            structured: OnceCell::new(),
        }
    }
}

/// See the [module documentation](self).
#[derive(Debug)]
pub struct Snapshot {
    cwd: PathBuf,
    filenames: BTreeSet<String>,
    args: Vec<String>,
    debugging: bool,
    trace: TraceSink,
    parser: Option<Box<dyn StructuredParser>>,
    inspector: Box<dyn RecipeInspector>,
    files: RefCell<HashMap<String, Rc<CachedFile>>>,
    memo: RefCell<HashMap<&'static str, bool>>,
}

impl Snapshot {
    /// Captures the immediate entries of `cwd` (non-recursive).
    ///
    /// Entries that cannot be read are skipped. Only an unreadable `cwd` is an error.
    pub fn build(
        cwd: impl Into<PathBuf>,
        args: Vec<String>,
        debugging: bool,
    ) -> Result<Self, SnapshotError> {
        let cwd = cwd.into();
        let entries = fs::read_dir(&cwd).map_err(|source| SnapshotError::ListDir {
            path: cwd.clone(),
            source,
        })?;

        let mut filenames = BTreeSet::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    filenames.insert(entry.file_name().to_string_lossy().into_owned());
                }
                Err(e) => log::warn!(
                    "Skipping unreadable entry in '{}': {}",
                    cwd.display(),
                    e
                ),
            }
        }
        log::debug!(
            "Snapshot of '{}': {} entries, {} args",
            cwd.display(),
            filenames.len(),
            args.len()
        );

        Ok(Self::from_parts(cwd, filenames, args, debugging))
    }

    /// Assembles a snapshot from an already-known listing, without touching the disk.
    pub fn from_parts<I, S>(
        cwd: impl Into<PathBuf>,
        filenames: I,
        args: Vec<String>,
        debugging: bool,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cwd: cwd.into(),
            filenames: filenames.into_iter().map(Into::into).collect(),
            args,
            debugging,
            trace: TraceSink::Stdout,
            parser: Some(Box::new(TomlParser)),
            inspector: Box::new(JustInspector::default()),
            files: RefCell::new(HashMap::new()),
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Replaces the structured-config parser. `None` makes every structured read
    /// [`StructuredConfig::Unsupported`].
    pub fn with_structured_parser(mut self, parser: Option<Box<dyn StructuredParser>>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the task-runner inspector used by the justfile rule.
    pub fn with_recipe_inspector(mut self, inspector: Box<dyn RecipeInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    /// Turns tracing on and keeps the trace in memory instead of printing it.
    pub fn with_captured_trace(mut self) -> Self {
        self.debugging = true;
        self.trace = TraceSink::Capture(RefCell::new(Vec::new()));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn filenames(&self) -> &BTreeSet<String> {
        &self.filenames
    }

    /// The arguments to forward, in their original order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn debugging(&self) -> bool {
        self.debugging
    }

    pub fn recipe_inspector(&self) -> &dyn RecipeInspector {
        self.inspector.as_ref()
    }

    /// True if the listing is non-empty and contains every one of `names`.
    pub fn has_all_files(&self, names: &[&str]) -> bool {
        !self.filenames.is_empty() && names.iter().all(|name| self.filenames.contains(*name))
    }

    /// True if the listing is non-empty and contains at least one of `names`.
    pub fn has_any_files(&self, names: &[&str]) -> bool {
        !self.filenames.is_empty() && names.iter().any(|name| self.filenames.contains(*name))
    }

    fn cached(&self, name: &str) -> Option<Rc<CachedFile>> {
        if !self.filenames.contains(name) {
            return None;
        }
        if let Some(hit) = self.files.borrow().get(name) {
            return Some(Rc::clone(hit));
        }

        let path = self.cwd.join(name);
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                // Directories such as `.venv` land here too.
                log::debug!("Could not read '{}': {}", path.display(), e);
                String::new()
            }
        };
        let file = Rc::new(CachedFile::new(text));
        self.files
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&file));
        Some(file)
    }

    /// The text of `name`, or an empty string if it is not in the listing.
    pub fn load_file(&self, name: &str) -> Rc<str> {
        self.cached(name)
            .map(|file| Rc::clone(&file.text))
            .unwrap_or_else(|| Rc::from(""))
    }

    /// The lines of `name` (without line terminators).
    pub fn read_file(&self, name: &str) -> Vec<String> {
        self.load_file(name).lines().map(str::to_string).collect()
    }

    /// `name` parsed as a JSON object. Absent files, malformed JSON, and non-object
    /// documents all read as an empty object.
    pub fn read_json(&self, name: &str) -> Rc<JsonMap> {
        let Some(file) = self.cached(name) else {
            return Rc::new(JsonMap::new());
        };
        Rc::clone(file.json.get_or_init(|| {
            match serde_json::from_str::<JsonValue>(&file.text) {
                Ok(JsonValue::Object(map)) => Rc::new(map),
                Ok(_) => {
                    log::debug!("'{}' is valid JSON but not an object", name);
                    Rc::new(JsonMap::new())
                }
                Err(e) => {
                    log::debug!("'{}' is not valid JSON: {}", name, e);
                    Rc::new(JsonMap::new())
                }
            }
        }))
    }

    /// `name` parsed by the structured-config parser, or
    /// [`StructuredConfig::Unsupported`] when there is none. Absent and malformed files read
    /// as an empty table.
    pub fn read_structured_config(&self, name: &str) -> StructuredConfig {
        let Some(parser) = self.parser.as_deref() else {
            return StructuredConfig::Unsupported;
        };
        let Some(file) = self.cached(name) else {
            return StructuredConfig::Parsed(Rc::new(toml::Table::new()));
        };
        let table = file.structured.get_or_init(|| match parser.parse(&file.text) {
            Ok(table) => Rc::new(table),
            Err(e) => {
                log::debug!("'{}' could not be parsed: {}", name, e);
                Rc::new(toml::Table::new())
            }
        });
        StructuredConfig::Parsed(Rc::clone(table))
    }

    /// True if `package.json` and `lockfile` are both present and `scripts.test` is truthy.
    pub fn has_test_script_and_lockfile(&self, lockfile: &str) -> bool {
        if !self.has_all_files(&[PACKAGE_JSON, lockfile]) {
            return false;
        }
        let package = self.read_json(PACKAGE_JSON);
        lookup::is_truthy(&dig(&*package, &["scripts", "test"], JsonValue::Null))
    }

    /// Evaluates `compute` once per snapshot and `key`; later calls return the stored answer.
    pub fn memoize(&self, key: &'static str, compute: impl FnOnce(&Self) -> bool) -> bool {
        if let Some(&hit) = self.memo.borrow().get(key) {
            return hit;
        }
        let value = compute(self);
        self.memo.borrow_mut().insert(key, value);
        value
    }

    /// Writes one trace line, indented by `indent` spaces. Does nothing unless debugging.
    pub fn debug(&self, message: &str, indent: usize) {
        if !self.debugging {
            return;
        }
        let padding = " ".repeat(indent);
        match &self.trace {
            TraceSink::Stdout => println!("{} {}{}", TRACE_PREFIX.dimmed(), padding, message),
            TraceSink::Capture(lines) => lines
                .borrow_mut()
                .push(format!("{} {}{}", TRACE_PREFIX, padding, message)),
        }
    }

    /// The captured trace, if this snapshot was built
    /// [`with_captured_trace`](Self::with_captured_trace).
    pub fn trace_lines(&self) -> Vec<String> {
        match &self.trace {
            TraceSink::Capture(lines) => lines.borrow().clone(),
            TraceSink::Stdout => Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn cached_names(&self) -> BTreeSet<String> {
        self.files.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_build_lists_files_and_directories() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.txt", "");
        fs::create_dir(dir.path().join(".pytest_cache")).unwrap();
        fs::create_dir_all(dir.path().join("nested").join("deeper")).unwrap();

        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        let names: Vec<&str> = snapshot.filenames().iter().map(String::as_str).collect();
        assert_eq!(names, vec![".pytest_cache", "a.txt", "nested"]);
    }

    #[test]
    fn test_build_fails_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = Snapshot::build(&missing, vec![], false);
        assert!(matches!(result, Err(SnapshotError::ListDir { .. })));
    }

    #[test]
    fn test_has_files() {
        let cases: [(&[&str], &[&str], bool); 7] = [
            (&["a", "b", "c"], &["a"], true),
            (&["a", "b", "c"], &["a", "b"], true),
            (&["a", "b", "c"], &["a", "b", "c"], true),
            (&["a", "b", "c"], &["a", "b", "c", "d"], false),
            (&[], &["a", "b", "c", "d"], false),
            (&["a"], &["b"], false),
            (&[], &[], false),
        ];
        for (files, looking, expected) in cases {
            let snapshot = Snapshot::from_parts("/", files.iter().copied(), vec![], false);
            assert_eq!(
                snapshot.has_all_files(looking),
                expected,
                "files={:?} looking={:?}",
                files,
                looking
            );
        }
    }

    #[test]
    fn test_has_any_files() {
        let snapshot = Snapshot::from_parts("/", ["a", "b"], vec![], false);
        assert!(snapshot.has_any_files(&["z", "b"]));
        assert!(!snapshot.has_any_files(&["z", "y"]));

        let empty = Snapshot::from_parts("/", Vec::<String>::new(), vec![], false);
        assert!(!empty.has_any_files(&["a"]));
        assert!(!empty.has_any_files(&[]));
    }

    #[test]
    fn test_read_file_uses_cache() {
        let dir = TempDir::new().unwrap();
        write(&dir, "my_file.txt", "cool\n  words\non\nlines");
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        let expected = vec!["cool", "  words", "on", "lines"];
        assert_eq!(snapshot.read_file("my_file.txt"), expected);

        fs::remove_file(dir.path().join("my_file.txt")).unwrap();
        assert_eq!(snapshot.read_file("my_file.txt"), expected);
        assert_eq!(
            snapshot.cached_names().into_iter().collect::<Vec<_>>(),
            vec!["my_file.txt"]
        );
    }

    #[test]
    fn test_read_json_uses_cache() {
        let dir = TempDir::new().unwrap();
        write(&dir, "my_file.json", "{\"a\": true, \n\n\"b\": \"cool\", \"d\": [1,2,3]}");
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        let expected = json!({"a": true, "b": "cool", "d": [1, 2, 3]});
        assert_eq!(JsonValue::Object((*snapshot.read_json("my_file.json")).clone()), expected);

        write(&dir, "my_file.json", "{\"changed\": 1}");
        assert_eq!(JsonValue::Object((*snapshot.read_json("my_file.json")).clone()), expected);
    }

    #[test]
    fn test_absent_file_reads_empty_without_caching() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        assert_eq!(&*snapshot.load_file("Makefile"), "");
        assert!(snapshot.read_file("Makefile").is_empty());
        assert!(snapshot.read_json("package.json").is_empty());
        assert!(snapshot.cached_names().is_empty());
    }

    #[test]
    fn test_file_created_after_build_is_not_seen() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();
        write(&dir, "Makefile", "test:");

        assert_eq!(&*snapshot.load_file("Makefile"), "");
    }

    #[test]
    fn test_malformed_json_reads_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{ not json");
        write(&dir, "list.json", "[1, 2]");
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        assert!(snapshot.read_json("package.json").is_empty());
        assert!(snapshot.read_json("list.json").is_empty());
    }

    #[test]
    fn test_directory_entry_reads_empty() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".venv")).unwrap();
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        assert_eq!(&*snapshot.load_file(".venv"), "");
    }

    #[test]
    fn test_read_structured_config() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[project]\nname = \"demo\"");
        write(&dir, "broken.toml", "[project\nname = ");
        let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

        let parsed = snapshot.read_structured_config("pyproject.toml");
        assert!(parsed.non_empty().is_some_and(|t| t.contains_key("project")));

        assert_eq!(
            snapshot.read_structured_config("broken.toml"),
            StructuredConfig::Parsed(Rc::new(toml::Table::new()))
        );
        assert_eq!(
            snapshot.read_structured_config("absent.toml"),
            StructuredConfig::Parsed(Rc::new(toml::Table::new()))
        );
    }

    #[test]
    fn test_read_structured_config_without_parser() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[project]\nname = \"demo\"");
        let snapshot = Snapshot::build(dir.path(), vec![], false)
            .unwrap()
            .with_structured_parser(None);

        assert_eq!(
            snapshot.read_structured_config("pyproject.toml"),
            StructuredConfig::Unsupported
        );
    }

    #[test]
    fn test_has_test_script_and_lockfile() {
        let cases = [
            (json!({"scripts": {"test": "jest"}}), true),
            (json!({"scripts": {"test": ""}}), false),
            (json!({"scripts": {"xtest": "jest"}}), false),
            (json!({"scripts": "test"}), false),
            (json!({"name": "whatever"}), false),
        ];
        for (package, expected) in cases {
            let dir = TempDir::new().unwrap();
            write(&dir, "package.json", &package.to_string());
            write(&dir, "yarn.lock", "");
            let snapshot = Snapshot::build(dir.path(), vec![], false).unwrap();

            assert_eq!(
                snapshot.has_test_script_and_lockfile("yarn.lock"),
                expected,
                "{}",
                package
            );
            assert!(!snapshot.has_test_script_and_lockfile("pnpm-lock.yaml"));
        }
    }

    #[test]
    fn test_memoize_computes_once() {
        let snapshot = Snapshot::from_parts("/", ["a"], vec![], false);
        let calls = std::cell::Cell::new(0);

        let first = snapshot.memoize("probe", |_| {
            calls.set(calls.get() + 1);
            true
        });
        let second = snapshot.memoize("probe", |_| {
            calls.set(calls.get() + 1);
            false
        });

        assert!(first);
        assert!(second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_debug_is_silent_unless_debugging() {
        let snapshot = Snapshot::from_parts("/", ["a"], vec![], false);
        snapshot.debug("hello", 0);
        assert!(snapshot.trace_lines().is_empty());

        let traced = Snapshot::from_parts("/", ["a"], vec![], false).with_captured_trace();
        traced.debug("hello", 0);
        traced.debug("indented", 4);
        assert_eq!(
            traced.trace_lines(),
            vec!["[utr] hello".to_string(), "[utr]     indented".to_string()]
        );
    }
}
