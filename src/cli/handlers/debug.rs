// src/cli/handlers/debug.rs

use crate::{
    core::{recipes::JustInspector, resolver::find_command, snapshot::Snapshot},
    models::Settings,
    system::executor::render_command,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::env;

/// Traces the resolution for the current directory and prints the result. Never runs it.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<i32> {
    let cwd = env::current_dir().context("Could not determine the current directory")?;

    let snapshot = Snapshot::build(&cwd, args, true)?
        .with_recipe_inspector(Box::new(JustInspector::new(settings.dump_timeout())));
    let command = find_command(&snapshot);

    if command.is_empty() {
        return Ok(1);
    }
    println!("\n{} {}", "->".dimmed(), render_command(&command).cyan().bold());
    Ok(0)
}
