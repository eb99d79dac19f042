// src/models.rs

use crate::constants::DEFAULT_DUMP_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// --- SETTINGS MODELS (FOR TOML) ---
// These are what the user writes in `~/.config/utr/config.toml`.

/// User-tunable behavior of the `t` runner.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Print the resolved command (dimmed) before running it.
    pub echo: bool,
    /// Clear the screen and scrollback before running.
    pub clear_pre_run: bool,
    /// Trace the resolution before running.
    pub debug: bool,
    /// Upper bound for the `just --dump` call made while checking justfiles.
    pub dump_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            echo: true,
            clear_pre_run: false,
            debug: false,
            dump_timeout_ms: DEFAULT_DUMP_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// The dump timeout as a `Duration`.
    pub fn dump_timeout(&self) -> Duration {
        Duration::from_millis(self.dump_timeout_ms)
    }
}

// --- EXTERNAL TOOL MODELS ---

/// The subset of `just --dump --dump-format json` that matters here.
/// Recipe bodies are kept opaque; only their names are inspected.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct JustDump {
    #[serde(default)]
    pub recipes: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("echo = false").unwrap();
        assert!(!settings.echo);
        assert!(!settings.clear_pre_run);
        assert_eq!(settings.dump_timeout_ms, DEFAULT_DUMP_TIMEOUT_MS);
    }

    #[test]
    fn test_just_dump_ignores_unknown_keys() {
        let dump: JustDump = serde_json::from_str(
            r#"{"aliases": {}, "first": "test", "recipes": {"test": {"name": "test"}, "lint": {}}}"#,
        )
        .unwrap();
        assert_eq!(
            dump.recipes.keys().collect::<Vec<_>>(),
            vec!["lint", "test"]
        );
    }

    #[test]
    fn test_just_dump_without_recipes() {
        let dump: JustDump = serde_json::from_str("{}").unwrap();
        assert!(dump.recipes.is_empty());
    }
}
