// src/system/executor.rs

use crate::{
    constants::{SCRIPT_EXTENSION, SYNTAX_CHECK_TIMEOUT},
    models::{ExecutionResult, SyntaxCheck},
    system::{
        dependencies,
        runner::{ProcessRunner, ProcessSlot},
        wrapper,
    },
};
use nix::sys::signal::Signal;
use std::collections::BTreeSet;
use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempPath;
use thiserror::Error;

/// Input rejected before anything was written or spawned.
///
/// Everything that goes wrong once a run has started is reported inside the
/// returned [`ExecutionResult`] instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Script content cannot be empty")]
    EmptyScript,
    #[error("Timeout must be greater than zero")]
    InvalidTimeout,
}

/// A cloneable way to interrupt whatever the owning executor is running.
///
/// Safe to use from another thread, such as a Ctrl+C forwarder, while the
/// executor's own thread is blocked inside [`ScriptExecutor::execute`].
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    slot: Arc<ProcessSlot>,
}

impl InterruptHandle {
    /// Sends SIGINT to the running script's process group. Returns whether a
    /// signal went out; with nothing running this does nothing.
    pub fn interrupt(&self) -> bool {
        self.slot.signal(Signal::SIGINT)
    }

    pub fn is_running(&self) -> bool {
        self.slot.current().is_some()
    }
}

/// Runs script text safely: wrapped in strict mode, from a private temporary
/// file, in its own process group, under a timeout.
///
/// One executor supervises one run at a time. Running scripts in parallel
/// needs one executor per run.
#[derive(Debug)]
pub struct ScriptExecutor {
    runner: ProcessRunner,
    default_timeout: Duration,
}

impl ScriptExecutor {
    pub fn new(
        interpreter: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            runner: ProcessRunner::new(interpreter, working_dir),
            default_timeout,
        }
    }

    /// Overrides the wait between SIGTERM and SIGKILL on timeout.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.runner = self.runner.with_grace_period(grace_period);
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// Executes `content` and reports the outcome.
    ///
    /// # Errors
    /// Only for input that is rejected up front: empty or whitespace-only
    /// content, or a zero timeout. Spawn failures, non-zero exits and
    /// timeouts all come back as `Ok`.
    pub fn execute(
        &self,
        content: &str,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, ExecutionError> {
        if content.trim().is_empty() {
            return Err(ExecutionError::EmptyScript);
        }
        let timeout = timeout.unwrap_or(self.default_timeout);
        if timeout.is_zero() {
            return Err(ExecutionError::InvalidTimeout);
        }

        let started = Instant::now();
        let script = match write_temp_script(&wrapper::prepare(content), true) {
            Ok(path) => scopeguard::guard(path, remove_temp_script),
            Err(e) => {
                log::warn!("Could not create a temporary script: {}", e);
                return Ok(ExecutionResult::failed(
                    format!("could not prepare temporary script: {}", e),
                    started.elapsed(),
                ));
            }
        };
        log::debug!("Prepared script at '{}'.", script.display());

        Ok(self.runner.run(&script, timeout))
    }

    /// Executes a single command line. Same contract as [`ScriptExecutor::execute`].
    pub fn execute_command(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, ExecutionError> {
        self.execute(command, timeout)
    }

    /// Asks the running script to stop with SIGINT. A no-op when idle.
    ///
    /// This does not wait: the call blocked in `execute` returns once the
    /// runner sees the process end, or once the timeout escalation ends it.
    pub fn interrupt(&self) {
        self.runner.slot().signal(Signal::SIGINT);
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            slot: self.runner.slot(),
        }
    }

    /// Parses `content` with the interpreter's no-exec mode (`-n`), unwrapped.
    pub fn validate_syntax(&self, content: &str) -> SyntaxCheck {
        if content.trim().is_empty() {
            return SyntaxCheck::invalid("Script content is empty");
        }

        let script = match write_temp_script(content, false) {
            Ok(path) => scopeguard::guard(path, remove_temp_script),
            Err(e) => return SyntaxCheck::invalid(format!("Syntax check failed: {}", e)),
        };

        let args = [PathBuf::from("-n"), script.to_path_buf()];
        match self.runner.try_run_with_args(&args, SYNTAX_CHECK_TIMEOUT) {
            Ok(result) if result.is_timed_out() => SyntaxCheck::invalid("Syntax check timed out"),
            Ok(result) if result.exit_code() == 0 => SyntaxCheck::valid(),
            Ok(result) => {
                let diagnostic = result.stderr().trim();
                if diagnostic.is_empty() {
                    SyntaxCheck::invalid("Syntax error detected")
                } else {
                    SyntaxCheck::invalid(diagnostic)
                }
            }
            Err(e) => SyntaxCheck::invalid(format!("Syntax check failed: {}", e)),
        }
    }

    /// Advisory list of external commands `content` appears to call.
    pub fn list_dependencies(&self, content: &str) -> BTreeSet<String> {
        dependencies::scan(content)
    }
}

impl SyntaxCheck {
    fn valid() -> Self {
        Self {
            valid: true,
            message: "Syntax is valid".to_string(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

// --- Temporary Scripts ---

/// Writes `content` to a fresh, uniquely named file that nobody else uses.
fn write_temp_script(content: &str, executable: bool) -> io::Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("scriptdeck-")
        .suffix(&format!(".{}", SCRIPT_EXTENSION))
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    if executable {
        fs::set_permissions(file.path(), Permissions::from_mode(0o755))?;
    }
    Ok(file.into_temp_path())
}

/// Deletes a temporary script. A failure is logged and otherwise ignored so it
/// can never hide the result of the run.
fn remove_temp_script(path: TempPath) {
    let display = path.display().to_string();
    match path.close() {
        Ok(()) => log::trace!("Removed temporary script '{}'.", display),
        Err(e) => log::warn!("Could not remove temporary script '{}': {}", display, e),
    }
}
