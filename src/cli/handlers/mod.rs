// src/cli/handlers/mod.rs

// One module per user-facing action. Every handler returns the process exit code.

pub mod config;
pub mod debug;
pub mod run;
