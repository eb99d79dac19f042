// src/cli/handlers/config.rs

use crate::{models::Settings, system::settings::settings_path};
use anyhow::Result;
use colored::Colorize;

pub fn handle(args: Vec<String>, settings: &Settings) -> Result<i32> {
    if !args.is_empty() {
        anyhow::bail!("'config' takes no arguments, got: {}", args.join(" "));
    }

    match settings_path() {
        Some(path) => {
            let state = if path.exists() { "" } else { " (not present, using defaults)" };
            println!("{} {}{}", "Settings file:".bold(), path.display(), state.dimmed());
        }
        None => println!("{}", "No config directory on this platform.".yellow()),
    }
    println!("\n{}", toml::to_string_pretty(settings)?);
    Ok(0)
}
