//! # utr
//!
//! Detects which test command a project directory expects (`cargo test`, `go test ./...`,
//! `yarn test`, `just test`, ...) and forwards the caller's arguments to it.
//!
//! The detection engine lives in [`core`]: a [`core::snapshot::Snapshot`] of the directory is
//! checked against an ordered [`core::registry::Registry`] of rules, and the first rule that
//! matches wins. Process spawning and settings live in [`system`].

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
