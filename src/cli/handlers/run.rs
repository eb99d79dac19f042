// src/cli/handlers/run.rs

use crate::{
    core::{recipes::JustInspector, resolver::find_command, snapshot::Snapshot},
    models::Settings,
    system::executor,
};
use anyhow::{Context, Result};
use std::env;

/// Resolves the test command for the current directory and runs it with `args` appended.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<i32> {
    let cwd = env::current_dir().context("Could not determine the current directory")?;
    log::debug!("Resolving test command in '{}' with args {:?}", cwd.display(), args);

    let snapshot = Snapshot::build(&cwd, args, settings.debug)?
        .with_recipe_inspector(Box::new(JustInspector::new(settings.dump_timeout())));
    let command = find_command(&snapshot);

    Ok(executor::run_test_command(&command, &cwd, settings)?)
}
