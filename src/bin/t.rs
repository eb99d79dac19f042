// src/bin/t.rs

use anyhow::Result;
use colored::*;
use std::env;
use utr::{
    cli::handlers,
    system::{executor::ExecutionError, settings},
};

/// `t` consumes no flags of its own: every argument belongs to the test command.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match run_cli(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // A missing test tool is an expected outcome, reported like a shell would.
            if let Some(ExecutionError::CommandNotFound(program)) =
                e.downcast_ref::<ExecutionError>()
            {
                println!("command not found: {program}");
                std::process::exit(1);
            }

            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_cli(args: Vec<String>) -> Result<i32> {
    log::debug!("Forwarding args: {:?}", args);
    let settings = settings::load_settings()?;
    handlers::run::handle(args, &settings)
}
