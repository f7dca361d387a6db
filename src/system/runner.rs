// src/system/runner.rs

//! Spawns one interpreter process in its own process group and supervises it
//! until it finishes or its timeout expires.
//!
//! The child always gets a fresh process group. A single signal to that group
//! reaches the script and everything it started, including background jobs, so
//! nothing is left orphaned when the run is cut short.

use crate::{
    constants::{GRACE_PERIOD, POLL_INTERVAL},
    models::{ExecutionResult, format_timeout_secs},
};
use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::ffi::OsStr;
use std::io::{self, Read};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const NO_GROUP: i32 = 0;

// --- Process Slot ---

/// The process group of the run currently in flight, if any.
///
/// Reads and writes are single atomic operations, so interrupt requests from
/// other threads need no further locking. The slot holds one group at a time;
/// overlapping runs on the same runner are not supported.
#[derive(Debug, Default)]
pub struct ProcessSlot {
    pgid: AtomicI32,
}

impl ProcessSlot {
    fn set(&self, pgid: i32) {
        let previous = self.pgid.swap(pgid, Ordering::SeqCst);
        if previous != NO_GROUP {
            log::warn!(
                "Process group {} replaced {} in the same runner; overlapping runs are unsupported.",
                pgid,
                previous
            );
        }
    }

    fn clear(&self) {
        self.pgid.store(NO_GROUP, Ordering::SeqCst);
    }

    /// The group id of the running script.
    pub fn current(&self) -> Option<Pid> {
        match self.pgid.load(Ordering::SeqCst) {
            NO_GROUP => None,
            raw => Some(Pid::from_raw(raw)),
        }
    }

    /// Sends `signal` to the running group. Returns whether it was delivered.
    pub fn signal(&self, signal: Signal) -> bool {
        match self.current() {
            Some(pgid) => send_to_group(pgid, signal),
            None => {
                log::trace!("No process running; {:?} not sent.", signal);
                false
            }
        }
    }
}

/// Delivers `signal` to every process in `pgid`.
///
/// A group that no longer exists is not an error: the caller wanted it gone.
fn send_to_group(pgid: Pid, signal: Signal) -> bool {
    match killpg(pgid, signal) {
        Ok(()) => {
            log::debug!("Sent {:?} to process group {}.", signal, pgid);
            true
        }
        Err(Errno::ESRCH) => {
            log::debug!("Process group {} already exited; {:?} dropped.", pgid, signal);
            false
        }
        Err(e) => {
            log::warn!("Failed to send {:?} to process group {}: {}", signal, pgid, e);
            false
        }
    }
}

fn group_alive(pgid: Pid) -> bool {
    killpg(pgid, None::<Signal>).is_ok()
}

// --- Runner ---

/// Runs scripts through an interpreter with a hard wall-clock bound.
#[derive(Debug)]
pub struct ProcessRunner {
    interpreter: PathBuf,
    working_dir: PathBuf,
    grace_period: Duration,
    slot: Arc<ProcessSlot>,
}

impl ProcessRunner {
    /// Creates a runner for `interpreter`, starting children in `working_dir`.
    pub fn new(interpreter: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            working_dir: working_dir.into(),
            grace_period: GRACE_PERIOD,
            slot: Arc::new(ProcessSlot::default()),
        }
    }

    /// Overrides the wait between SIGTERM and SIGKILL.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Shared view of the in-flight process group.
    pub fn slot(&self) -> Arc<ProcessSlot> {
        Arc::clone(&self.slot)
    }

    /// Runs `script` and reports how it ended. Never fails: spawn errors and
    /// timeouts are described in the returned result.
    pub fn run(&self, script: &Path, timeout: Duration) -> ExecutionResult {
        self.run_with_args(&[script.as_os_str()], timeout)
    }

    /// Like [`ProcessRunner::run`], with an explicit interpreter argument list.
    pub fn run_with_args<S: AsRef<OsStr>>(&self, args: &[S], timeout: Duration) -> ExecutionResult {
        let started = Instant::now();
        self.try_run_with_args(args, timeout)
            .unwrap_or_else(|e| ExecutionResult::failed(e, started.elapsed()))
    }

    /// Spawns and supervises the interpreter. `Err` means nothing could be
    /// started or supervised; every other outcome is an `Ok` result.
    pub(crate) fn try_run_with_args<S: AsRef<OsStr>>(
        &self,
        args: &[S],
        timeout: Duration,
    ) -> io::Result<ExecutionResult> {
        let started = Instant::now();
        let mut child = self.build_command(args).spawn().map_err(|e| {
            log::debug!("Failed to spawn '{}': {}", self.interpreter.display(), e);
            e
        })?;

        let pgid = match i32::try_from(child.id()) {
            Ok(raw) => Pid::from_raw(raw),
            Err(_) => {
                child.kill().ok();
                child.wait().ok();
                return Err(io::Error::other("process id out of range"));
            }
        };
        log::debug!(
            "Spawned '{}' as process group {} (timeout {}s).",
            self.interpreter.display(),
            pgid,
            format_timeout_secs(timeout)
        );

        self.slot.set(pgid.as_raw());
        scopeguard::defer! {
            self.slot.clear();
        }

        let stdout_reader = spawn_reader("stdout", child.stdout.take());
        let stderr_reader = spawn_reader("stderr", child.stderr.take());

        // A timeout too large to represent as an instant never expires.
        let deadline = started.checked_add(timeout);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) if is_drained(&stdout_reader) && is_drained(&stderr_reader) => {
                    break Some(status);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Lost track of process group {}: {}", pgid, e);
                    self.terminate(&mut child, pgid);
                    return Err(e);
                }
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        };

        let Some(status) = status else {
            log::warn!(
                "Script exceeded its {}s timeout; terminating process group {}.",
                format_timeout_secs(timeout),
                pgid
            );
            self.terminate(&mut child, pgid);
            // Output of a killed run is discarded; the readers end on their own at EOF.
            return Ok(ExecutionResult::timed_out(timeout, started.elapsed()));
        };

        let stdout = collect(stdout_reader);
        let stderr = collect(stderr_reader);
        let exit_code = exit_code_of(status);
        log::debug!(
            "Process group {} exited with code {} after {:?}.",
            pgid,
            exit_code,
            started.elapsed()
        );

        Ok(ExecutionResult::completed(
            exit_code,
            stdout,
            stderr,
            started.elapsed(),
        ))
    }

    fn build_command<S: AsRef<OsStr>>(&self, args: &[S]) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .args(args)
            .current_dir(dunce::simplified(&self.working_dir))
            // Keep the user's startup files out of non-interactive runs.
            .env("BASH_ENV", "/dev/null")
            // A background group reading the terminal would be stopped by SIGTTIN.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0);
        command
    }

    /// Two-step shutdown: SIGTERM to the group, a bounded wait, then SIGKILL.
    fn terminate(&self, child: &mut Child, pgid: Pid) {
        send_to_group(pgid, Signal::SIGTERM);

        // An unrepresentable grace period escalates at once rather than waiting forever.
        let grace_deadline = Instant::now().checked_add(self.grace_period);
        loop {
            let leader_exited = matches!(child.try_wait(), Ok(Some(_)));
            if leader_exited && !group_alive(pgid) {
                log::debug!("Process group {} stopped after SIGTERM.", pgid);
                return;
            }
            if grace_deadline.is_none_or(|deadline| Instant::now() >= deadline) {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        log::warn!(
            "Process group {} still alive {:?} after SIGTERM; sending SIGKILL.",
            pgid,
            self.grace_period
        );
        send_to_group(pgid, Signal::SIGKILL);
        if let Err(e) = child.wait() {
            log::warn!("Failed to reap process {}: {}", pgid, e);
        }
    }
}

// --- Output Capture ---

fn spawn_reader<R>(label: &'static str, pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    let mut pipe = pipe?;
    thread::Builder::new()
        .name(format!("scriptdeck-{}", label))
        .spawn(move || {
            let mut buffer = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buffer) {
                log::debug!("Reading child {} stopped early: {}", label, e);
            }
            buffer
        })
        .map_err(|e| log::warn!("Could not start the {} reader: {}", label, e))
        .ok()
}

fn is_drained(reader: &Option<JoinHandle<Vec<u8>>>) -> bool {
    reader.as_ref().is_none_or(JoinHandle::is_finished)
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Exit status as a number; signal deaths follow the shell's `128 + n` rule.
fn exit_code_of(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(crate::constants::TIMEOUT_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("script.sh");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_run_captures_output_and_exit_code() {
        // --- Setup ---
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo out\necho err >&2\nexit 4\n");
        let runner = ProcessRunner::new("bash", dir.path());

        // --- Execute ---
        let result = runner.run(&script, Duration::from_secs(10));

        // --- Assert ---
        assert_eq!(result.exit_code(), 4);
        assert_eq!(result.stdout(), "out\n");
        assert_eq!(result.stderr(), "err\n");
        assert!(!result.is_timed_out());
        assert!(runner.slot().current().is_none());
    }

    #[test]
    fn test_run_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "pwd -P\n");
        let runner = ProcessRunner::new("bash", dir.path());

        let result = runner.run(&script, Duration::from_secs(10));

        let expected = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(result.stdout().trim_end(), expected.to_string_lossy());
    }

    #[test]
    fn test_run_disables_bash_env() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo \"$BASH_ENV\"\n");
        let runner = ProcessRunner::new("bash", dir.path());

        let result = runner.run(&script, Duration::from_secs(10));

        assert_eq!(result.stdout(), "/dev/null\n");
    }

    #[test]
    fn test_spawn_failure_is_reported_in_result() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo never\n");
        let runner = ProcessRunner::new("/definitely/not/a/shell", dir.path());

        let result = runner.run(&script, Duration::from_secs(5));

        assert_eq!(result.exit_code(), -1);
        assert!(!result.is_timed_out());
        assert!(result.stderr().starts_with("Execution error: "));
        assert!(runner.slot().current().is_none());
    }

    #[test]
    fn test_missing_working_directory_is_a_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo never\n");
        let runner = ProcessRunner::new("bash", dir.path().join("gone"));

        let result = runner.run(&script, Duration::from_secs(5));

        assert_eq!(result.exit_code(), -1);
        assert!(result.stderr().starts_with("Execution error: "));
    }

    #[test]
    fn test_timeout_kills_the_group() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "sleep 100\n");
        let runner = ProcessRunner::new("bash", dir.path());

        let started = Instant::now();
        let result = runner.run(&script, Duration::from_secs(1));

        assert!(result.is_timed_out());
        assert_eq!(result.exit_code(), -1);
        assert_eq!(result.stdout(), "");
        assert_eq!(result.stderr(), "Script execution timed out after 1 seconds");
        assert!(started.elapsed() < Duration::from_secs(1) + GRACE_PERIOD + Duration::from_secs(2));
        assert!(runner.slot().current().is_none());
    }

    #[test]
    fn test_grace_period_too_large_for_an_instant_still_kills() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "sleep 100\n");
        let runner = ProcessRunner::new("bash", dir.path()).with_grace_period(Duration::MAX);

        let result = runner.run(&script, Duration::from_millis(300));

        assert!(result.is_timed_out());
        assert!(runner.slot().current().is_none());
    }

    #[test]
    fn test_timeout_escalates_to_sigkill_when_sigterm_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "trap '' TERM\nsleep 100\n");
        let runner =
            ProcessRunner::new("bash", dir.path()).with_grace_period(Duration::from_millis(500));

        let started = Instant::now();
        let result = runner.run(&script, Duration::from_millis(500));

        assert!(result.is_timed_out());
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_background_job_holding_output_is_bounded_by_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "sleep 100 &\necho started\n");
        let runner = ProcessRunner::new("bash", dir.path());

        let started = Instant::now();
        let result = runner.run(&script, Duration::from_secs(1));

        assert!(result.is_timed_out());
        assert!(started.elapsed() < Duration::from_secs(1) + GRACE_PERIOD + Duration::from_secs(2));
    }

    #[test]
    fn test_signal_on_empty_slot_is_a_no_op() {
        let slot = ProcessSlot::default();
        assert!(!slot.signal(Signal::SIGINT));
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_exit_code_of_signal_death() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "kill -KILL $$\n");
        let runner = ProcessRunner::new("bash", dir.path());

        let result = runner.run(&script, Duration::from_secs(10));

        assert_eq!(result.exit_code(), 128 + 9);
        assert!(!result.is_timed_out());
    }
}
