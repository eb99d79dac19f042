// src/bin/utr.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::*;
use utr::{
    cli::{Cli, handlers},
    models::Settings,
    system::settings,
};

// --- Command Definition and Registry ---

/// A subcommand, its aliases, and its handler. Handlers return the exit code.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Settings) -> Result<i32>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "debug",
        aliases: &[],
        handler: handlers::debug::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &["settings"],
        handler: handlers::config::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_cli(cli: Cli) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(action) = args.next() else {
        // Like any command group: without a subcommand, show the help.
        Cli::command().print_help()?;
        println!();
        return Ok(0);
    };

    let Some(command) = find_command(&action) else {
        anyhow::bail!(
            "Unknown command '{}'. Run `utr --help` to see what is available.",
            action
        );
    };

    let settings = settings::load_settings()?;
    (command.handler)(args.collect(), &settings)
}
