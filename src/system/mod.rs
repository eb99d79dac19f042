//! # System Interaction Layer
//!
//! The boundary between the resolution engine and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Runs the resolved test command with inherited stdio and turns its exit
//!   status into the process exit code. Also handles echo and screen clearing.
//! - **`settings`**: Loads `config.toml` from the user's config directory and applies the
//!   `UTR_*` environment overrides.

pub mod executor;
pub mod settings;
