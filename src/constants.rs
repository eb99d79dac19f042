// src/constants.rs

/// The JS package descriptor inspected by the lockfile rules.
pub const PACKAGE_JSON: &str = "package.json";

/// The Python project descriptor inspected by the pytest heuristic.
pub const PYPROJECT_TOML: &str = "pyproject.toml";

/// Every spelling of a justfile that `just` picks up on its own.
pub const JUSTFILE_NAMES: [&str; 3] = ["justfile", "Justfile", ".justfile"];

/// The build file whose `test:` target is honored.
pub const MAKEFILE: &str = "Makefile";

/// The name of the directory holding utr's settings (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "utr";

/// The name of the settings file (inside the utr config dir).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Prefix for every line of the resolution trace.
pub const TRACE_PREFIX: &str = "[utr]";

/// Where new handlers get requested.
pub const ISSUES_URL: &str = "https://github.com/retypeos/utr/issues";

/// Default bound on the external `just --dump` call, in milliseconds.
pub const DEFAULT_DUMP_TIMEOUT_MS: u64 = 5_000;

// Environment toggles.
pub const ENV_DISABLE_ECHO: &str = "UTR_DISABLE_ECHO";
pub const ENV_CLEAR_PRE_RUN: &str = "UTR_CLEAR_PRE_RUN";
pub const ENV_DEBUG: &str = "UTR_DEBUG";
pub const ENV_DUMP_TIMEOUT_MS: &str = "UTR_DUMP_TIMEOUT_MS";
