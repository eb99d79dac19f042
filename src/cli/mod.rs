use clap::Parser;

pub mod handlers;

const ABOUT: &str = "This command only exists to print information about the package.
To run your actual tests, use the actual test runner: `t`.";

const AFTER_HELP: &str = "Commands:
  debug [ARGS]...  Run command with extra logs so you know why it was chosen
  config           Show where settings are read from and their effective values";

/// utr: the informational companion of the `t` test runner.
#[derive(Parser, Debug)]
#[command(
    name = "utr",
    author,
    version,
    about = ABOUT,
    after_help = AFTER_HELP,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The subcommand and everything after it.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub args: Vec<String>,
}
