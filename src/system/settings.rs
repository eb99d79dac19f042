// src/system/settings.rs

use crate::{
    constants::{
        CONFIG_DIR_NAME, CONFIG_FILENAME, ENV_CLEAR_PRE_RUN, ENV_DEBUG, ENV_DISABLE_ECHO,
        ENV_DUMP_TIMEOUT_MS,
    },
    models::Settings,
};
use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the settings file lives, if the platform has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Loads the effective settings: the user's file (if any), then environment overrides.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let settings = match settings_path() {
        Some(path) => load_settings_file(&path)?,
        None => Settings::default(),
    };
    Ok(apply_env_overrides(settings, |key| env::var_os(key)))
}

/// Reads one settings file. A missing file yields the defaults; a broken one is an error.
pub fn load_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        log::debug!("No settings file at '{}', using defaults.", path.display());
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies the `UTR_*` toggles. A toggle counts as set whenever the variable exists,
/// whatever its value (even one that is not valid Unicode).
pub fn apply_env_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<OsString>,
) -> Settings {
    if lookup(ENV_DISABLE_ECHO).is_some() {
        settings.echo = false;
    }
    if lookup(ENV_CLEAR_PRE_RUN).is_some() {
        settings.clear_pre_run = true;
    }
    if lookup(ENV_DEBUG).is_some() {
        settings.debug = true;
    }
    if let Some(raw) = lookup(ENV_DUMP_TIMEOUT_MS) {
        match raw.to_str().and_then(|text| text.trim().parse::<u64>().ok()) {
            Some(ms) => settings.dump_timeout_ms = ms,
            None => log::warn!(
                "Ignoring {}={:?}: not a number of milliseconds.",
                ENV_DUMP_TIMEOUT_MS,
                raw
            ),
        }
    }
    settings
}
