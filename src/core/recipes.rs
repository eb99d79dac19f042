//! # Recipe Inspection
//!
//! Asking a task runner which recipes a project defines is a side effect (it spawns a
//! process), so it sits behind the [`RecipeInspector`] trait. The default implementation shells
//! out to `just --dump --dump-format json`; tests inject a scripted double instead.

use crate::models::JustDump;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const JUST_PROGRAM: &str = "just";

/// `--unstable` is no longer required by recent `just` releases, but older ones still need it.
const DUMP_ARGS: [&str; 4] = ["--dump", "--dump-format", "json", "--unstable"];

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Every way asking the task runner can fail. Callers treat all of them as "inspect the file
/// text instead".
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("'{0}' is not installed or not on the PATH")]
    NotInstalled(String),
    #[error("'{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{0}' exited with a non-zero status")]
    NonZeroExit(String),
    #[error("'{program}' did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
    #[error("'{program}' printed a dump that could not be parsed: {source}")]
    MalformedDump {
        program: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error while waiting for '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Lists the recipes a task-runner file defines.
pub trait RecipeInspector: fmt::Debug {
    /// Returns the recipe names defined for the project rooted at `cwd`.
    fn recipe_names(&self, cwd: &Path) -> Result<BTreeSet<String>, InspectError>;
}

/// Runs `just --dump --dump-format json --unstable` in the project directory.
///
/// The child is killed once `timeout` elapses, so a hung `just` cannot hang resolution.
#[derive(Debug, Clone)]
pub struct JustInspector {
    program: String,
    timeout: Duration,
}

impl JustInspector {
    /// Creates an inspector that calls `just` from the `PATH`.
    pub fn new(timeout: Duration) -> Self {
        Self::with_program(JUST_PROGRAM, timeout)
    }

    /// Creates an inspector that calls a specific executable.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn io_error(&self, source: io::Error) -> InspectError {
        InspectError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for JustInspector {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::constants::DEFAULT_DUMP_TIMEOUT_MS,
        ))
    }
}

impl RecipeInspector for JustInspector {
    fn recipe_names(&self, cwd: &Path) -> Result<BTreeSet<String>, InspectError> {
        log::debug!(
            "Running '{} {}' in '{}'",
            self.program,
            DUMP_ARGS.join(" "),
            cwd.display()
        );

        let mut child = StdCommand::new(&self.program)
            .args(DUMP_ARGS)
            .current_dir(dunce::simplified(cwd))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    InspectError::NotInstalled(self.program.clone())
                } else {
                    InspectError::Spawn {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        // Drain stdout on its own thread so a large dump cannot fill the pipe while we poll.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.io_error(io::Error::other("child stdout was not captured")))?;
        let reader = thread::spawn(move || {
            let mut buffer = Vec::new();
            stdout.read_to_end(&mut buffer).map(|_| buffer)
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        log::warn!(
                            "'{}' did not finish within {:?}, killing it (PID: {})",
                            self.program,
                            self.timeout,
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        child.wait().ok();
                        return Err(InspectError::TimedOut {
                            program: self.program.clone(),
                            timeout: self.timeout,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(self.io_error(e)),
            }
        };

        let output = reader
            .join()
            .map_err(|_| self.io_error(io::Error::other("stdout reader thread panicked")))?
            .map_err(|e| self.io_error(e))?;

        if !status.success() {
            return Err(InspectError::NonZeroExit(self.program.clone()));
        }

        let dump: JustDump =
            serde_json::from_slice(&output).map_err(|e| InspectError::MalformedDump {
                program: self.program.clone(),
                source: e,
            })?;

        Ok(dump.recipes.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Writes an executable shell script standing in for `just`.
    #[cfg(unix)]
    fn fake_just(dir: &TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-just");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_program_is_not_installed() {
        let dir = TempDir::new().unwrap();
        let inspector = JustInspector::with_program(
            "utr-test-no-such-binary-anywhere",
            Duration::from_secs(1),
        );

        let result = inspector.recipe_names(dir.path());
        assert!(matches!(result, Err(InspectError::NotInstalled(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let inspector = JustInspector::with_program("false", Duration::from_secs(5));

        let result = inspector.recipe_names(dir.path());
        assert!(matches!(result, Err(InspectError::NonZeroExit(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_output_is_malformed_dump() {
        let dir = TempDir::new().unwrap();
        let inspector = JustInspector::with_program("true", Duration::from_secs(5));

        let result = inspector.recipe_names(dir.path());
        assert!(matches!(result, Err(InspectError::MalformedDump { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_program_is_killed_at_deadline() {
        let dir = TempDir::new().unwrap();
        let program = fake_just(&dir, "exec sleep 30");
        let inspector = JustInspector::with_program(program, Duration::from_millis(200));

        let started = Instant::now();
        let result = inspector.recipe_names(dir.path());
        let elapsed = started.elapsed();

        match result {
            Err(InspectError::TimedOut { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("expected TimedOut, got {other:?}"),
        }
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_dump_lists_recipe_names() {
        let dir = TempDir::new().unwrap();
        let program = fake_just(
            &dir,
            r#"echo '{"first": "lint", "recipes": {"lint": {}, "test": {"name": "test"}}}'"#,
        );
        let inspector = JustInspector::with_program(program, Duration::from_secs(5));

        let recipes = inspector.recipe_names(dir.path()).unwrap();
        assert_eq!(recipes.into_iter().collect::<Vec<_>>(), vec!["lint", "test"]);
    }
}
