// src/models.rs

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::TIMEOUT_EXIT_CODE;

// --- EXECUTION MODELS ---

/// The outcome of a single script execution.
///
/// Values are built once by the process runner and only read afterwards, so the
/// fields are private and exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    duration: Duration,
    timed_out: bool,
}

impl ExecutionResult {
    /// A run that reached the end on its own, whatever its exit code.
    pub fn completed(exit_code: i32, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            timed_out: false,
        }
    }

    /// A run that was terminated because it outlived its timeout.
    pub fn timed_out(timeout: Duration, duration: Duration) -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            stdout: String::new(),
            stderr: format!(
                "Script execution timed out after {} seconds",
                format_timeout_secs(timeout)
            ),
            duration,
            timed_out: true,
        }
    }

    /// A run that could not be started or supervised.
    pub fn failed(description: impl std::fmt::Display, duration: Duration) -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            stdout: String::new(),
            stderr: format!("Execution error: {}", description),
            duration,
            timed_out: false,
        }
    }

    /// Exit status of the script, or `-1` for internal failures and timeouts.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Everything the script wrote to standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Everything the script wrote to standard error.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Wall-clock time from spawn until the run was settled.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the run was ended by the timeout path.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Exit code zero and not killed by the timeout.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Renders a timeout the way users typed it: whole seconds without a fraction.
pub fn format_timeout_secs(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        timeout.as_secs().to_string()
    } else {
        format!("{}", timeout.as_secs_f64())
    }
}

/// Answer of the interpreter's parse-only mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxCheck {
    pub valid: bool,
    pub message: String,
}

/// A structural problem spotted by the advisory checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line number.
    pub line: usize,
    /// 0-based character column.
    pub column: usize,
    pub message: String,
}

// --- PERSISTENCE MODELS ---

/// One row of the script listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
    pub path: PathBuf,
}

/// A record of the `.metadata.json` sidecar, keyed by script name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScriptMetadata {
    pub filename: String,
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed: Option<DateTime<Local>>,
    pub size: u64,
    /// Truncated blake3 digest of the saved content.
    #[serde(default)]
    pub hash: String,
}

/// Everything `info` knows about a saved script.
#[derive(Debug, Clone)]
pub struct ScriptDetails {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub permissions: String,
    pub modified: DateTime<Local>,
    pub line_count: usize,
    pub metadata: Option<ScriptMetadata>,
}

// --- CONFIGURATION MODELS ---

/// Represents the deserialized structure of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Where saved scripts live. Supports `~` and `$VAR` expansion.
    pub script_dir: String,
    /// Timeout applied when a command does not pass `--timeout`.
    pub default_timeout_secs: u64,
    /// Ask before running anything.
    pub confirm_before_run: bool,
    /// Interpreter binary, looked up on `PATH` when not absolute.
    pub interpreter: String,
    /// Working directory for script runs. Defaults to the current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Colorize scripts when showing them.
    pub highlight: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            script_dir: crate::constants::DEFAULT_SCRIPT_DIR.to_string(),
            default_timeout_secs: crate::constants::DEFAULT_TIMEOUT_SECS,
            confirm_before_run: true,
            interpreter: crate::constants::DEFAULT_INTERPRETER.to_string(),
            working_dir: None,
            highlight: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_result_carries_sentinel_and_message() {
        let result = ExecutionResult::timed_out(Duration::from_secs(3), Duration::from_secs(3));
        assert!(result.is_timed_out());
        assert_eq!(result.exit_code(), -1);
        assert_eq!(result.stdout(), "");
        assert_eq!(result.stderr(), "Script execution timed out after 3 seconds");
        assert!(!result.is_success());
    }

    #[test]
    fn test_failed_result_is_not_a_timeout() {
        let result = ExecutionResult::failed("No such file or directory", Duration::ZERO);
        assert!(!result.is_timed_out());
        assert_eq!(result.exit_code(), -1);
        assert_eq!(result.stderr(), "Execution error: No such file or directory");
    }

    #[test]
    fn test_format_timeout_secs() {
        assert_eq!(format_timeout_secs(Duration::from_secs(30)), "30");
        assert_eq!(format_timeout_secs(Duration::from_millis(1500)), "1.5");
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("default_timeout_secs = 5").unwrap();
        assert_eq!(config.default_timeout_secs, 5);
        assert_eq!(config.interpreter, "bash");
        assert!(config.confirm_before_run);
        assert!(config.working_dir.is_none());
    }
}
