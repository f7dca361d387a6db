// src/constants.rs

use std::time::Duration;

/// Name of the application directory under the system config dir.
pub const APP_DIR_NAME: &str = "scriptdeck";

/// The configuration file inside the application config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that replaces the config directory (tests, portable installs).
pub const CONFIG_DIR_ENV: &str = "SCRIPTDECK_CONFIG_DIR";

/// Sidecar with per-script metadata, stored next to the scripts.
pub const METADATA_FILENAME: &str = ".metadata.json";

/// Extension given to every saved script.
pub const SCRIPT_EXTENSION: &str = "sh";

/// Where scripts are stored when nothing else is configured.
pub const DEFAULT_SCRIPT_DIR: &str = "./scripts";

pub const DEFAULT_INTERPRETER: &str = "bash";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Time a group gets between SIGTERM and SIGKILL.
pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Bound for the interpreter's parse-only run.
pub const SYNTAX_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the runner looks at the child while it waits.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exit code reported for timeouts and internal failures.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Longest accepted script name.
pub const MAX_SCRIPT_NAME_LEN: usize = 100;
