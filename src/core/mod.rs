// src/core/mod.rs

pub mod heuristics;
pub mod lookup;
pub mod recipes;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod rules;
pub mod snapshot;
pub mod structured;
