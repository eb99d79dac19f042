// src/system/executor.rs

use crate::models::Settings;
use colored::Colorize;
use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

/// Clears the screen and the scrollback, then homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[3J\x1b[1;1H";

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program itself is missing (e.g. `pytest` chosen but not installed).
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
}

/// Renders a command the way a shell user would type it.
pub fn render_command(command: &[String]) -> String {
    shlex::try_join(command.iter().map(String::as_str)).unwrap_or_else(|_| command.join(" "))
}

/// Runs a resolved test command and returns the exit code to finish with.
///
/// An empty command means no rule matched: that is reported and yields 1.
pub fn run_test_command(
    command: &[String],
    cwd: &Path,
    settings: &Settings,
) -> Result<i32, ExecutionError> {
    run_test_command_to(&mut io::stdout(), command, cwd, settings)
}

/// Like [`run_test_command`], with the pre-run output (clear, echo) going to `out`.
///
/// `out` is flushed before the child starts, so nothing written here can land after the
/// child's own output.
pub fn run_test_command_to(
    out: &mut impl Write,
    command: &[String],
    cwd: &Path,
    settings: &Settings,
) -> Result<i32, ExecutionError> {
    if command.is_empty() {
        if let Err(e) = writeln!(out, "no testing method found!").and_then(|()| out.flush()) {
            log::warn!("Could not write to the terminal: {}", e);
        }
        return Ok(1);
    }

    if let Err(e) = write_preamble(out, command, settings) {
        log::warn!("Could not write the pre-run output: {}", e);
    }

    execute_command(command, cwd)
}

fn write_preamble(
    out: &mut impl Write,
    command: &[String],
    settings: &Settings,
) -> io::Result<()> {
    if settings.clear_pre_run {
        write!(out, "{CLEAR_SCREEN}")?;
    }
    if settings.echo {
        writeln!(out, "{}", format!("-> {}", render_command(command)).dimmed())?;
    }
    out.flush()
}

/// Spawns `command` with inherited stdio, waits for it, and returns its exit code.
pub fn execute_command(command: &[String], cwd: &Path) -> Result<i32, ExecutionError> {
    let Some((program, args)) = command.split_first() else {
        return Err(ExecutionError::EmptyCommand);
    };
    let clean_cwd = dunce::simplified(cwd);
    log::debug!("Executing {:?} in '{}'", command, clean_cwd.display());

    let spawned = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    // Fallback for Windows shims like `npm.cmd`, which only resolve through `cmd /C`.
    let status = match spawned {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .args(command)
                .current_dir(clean_cwd)
                .status()
                .map_err(|e| ExecutionError::CommandFailed(render_command(command), e))?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ExecutionError::CommandNotFound(program.clone()));
        }
        Err(e) => return Err(ExecutionError::CommandFailed(render_command(command), e)),
    };

    Ok(exit_code(status))
}

/// The child's exit code; shells report death-by-signal as `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
