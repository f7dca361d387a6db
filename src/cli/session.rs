// src/cli/session.rs

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::{
    core::{paths, store::ScriptStore},
    models::AppConfig,
    system::executor::ScriptExecutor,
};

/// State shared by every command during one invocation: the script being
/// edited, the store it is saved to and the executor that runs it.
#[derive(Debug)]
pub struct Session {
    pub config: AppConfig,
    pub store: ScriptStore,
    pub executor: ScriptExecutor,
    /// Set by `--yes`: every confirmation is answered with yes.
    pub assume_yes: bool,
    lines: Vec<String>,
    name: Option<String>,
    /// Content as last saved or loaded, to detect unsaved edits.
    saved_snapshot: Option<String>,
    exit_requested: bool,
}

impl Session {
    pub fn new(config: AppConfig, store: ScriptStore, executor: ScriptExecutor) -> Self {
        Self {
            config,
            store,
            executor,
            assume_yes: false,
            lines: Vec::new(),
            name: None,
            saved_snapshot: None,
            exit_requested: false,
        }
    }

    /// Builds the store and executor described by `config`. Relative paths are
    /// resolved against `base_dir`.
    pub fn from_config(config: AppConfig, base_dir: &Path) -> Result<Self> {
        let script_dir = paths::expand_path_template(&config.script_dir, base_dir)?;
        let store = ScriptStore::open(&script_dir)
            .with_context(|| format!("Failed to open script directory '{}'", script_dir.display()))?;

        let working_dir = match &config.working_dir {
            Some(dir) => paths::expand_path_template(dir, base_dir)?,
            None => base_dir.to_path_buf(),
        };
        let executor = ScriptExecutor::new(
            &config.interpreter,
            working_dir,
            Duration::from_secs(config.default_timeout_secs),
        );

        log::debug!(
            "Session ready: scripts in {}, interpreter '{}'",
            script_dir.display(),
            config.interpreter
        );
        Ok(Self::new(config, store, executor))
    }

    // --- Buffer ---

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replaces the lines being edited, keeping the current name.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Starts an empty, never-saved script called `name`.
    pub fn start_new(&mut self, name: String) {
        self.name = Some(name);
        self.lines.clear();
        self.saved_snapshot = None;
    }

    /// Makes `content`, just read from the store as `name`, the current script.
    pub fn load(&mut self, name: String, content: &str) {
        self.lines = content.split('\n').map(str::to_string).collect();
        self.name = Some(name);
        self.saved_snapshot = Some(content.to_string());
    }

    /// Records that the buffer was written to the store as `name`.
    pub fn mark_saved(&mut self, name: String) {
        self.saved_snapshot = Some(self.content());
        self.name = Some(name);
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Drops the current script entirely, name included.
    pub fn forget(&mut self) {
        self.lines.clear();
        self.name = None;
        self.saved_snapshot = None;
    }

    /// True when the buffer holds lines that differ from what was last saved or loaded.
    pub fn has_unsaved_changes(&self) -> bool {
        if self.lines.is_empty() {
            return false;
        }
        match &self.saved_snapshot {
            Some(saved) => *saved != self.content(),
            None => true,
        }
    }

    /// Prompt decoration: `[name]`, `[name*]` with unsaved edits, `[*]` for an
    /// unnamed buffer, empty when there is nothing to show.
    pub fn status(&self) -> String {
        let marker = if self.has_unsaved_changes() { "*" } else { "" };
        match &self.name {
            Some(name) => format!("[{}{}]", name, marker),
            None if !marker.is_empty() => "[*]".to_string(),
            None => String::new(),
        }
    }

    // --- Lifecycle ---

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Whether `run`/`execute` should skip the "Execute this script?" question.
    pub fn skip_run_confirmation(&self, yes_flag: bool) -> bool {
        yes_flag || self.assume_yes || !self.config.confirm_before_run
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// A session over a throwaway script directory. Keep the `TempDir` alive
    /// for as long as the session is used.
    pub(crate) fn test_session() -> (Session, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            script_dir: dir.path().join("scripts").display().to_string(),
            default_timeout_secs: 10,
            confirm_before_run: false,
            highlight: false,
            ..AppConfig::default()
        };
        let mut session = Session::from_config(config, dir.path()).unwrap();
        session.assume_yes = true;
        (session, dir)
    }

    #[test]
    fn test_status_tracks_name_and_changes() {
        // --- Setup ---
        let (mut session, _dir) = test_session();
        assert_eq!(session.status(), "");

        // --- Execute & Assert ---
        session.set_lines(vec!["echo hi".to_string()]);
        assert_eq!(session.status(), "[*]");

        session.mark_saved("greet".to_string());
        assert_eq!(session.status(), "[greet]");
        assert!(!session.has_unsaved_changes());

        session.set_lines(vec!["echo bye".to_string()]);
        assert_eq!(session.status(), "[greet*]");
    }

    #[test]
    fn test_load_splits_lines_and_is_clean() {
        let (mut session, _dir) = test_session();
        session.load("two".to_string(), "echo 1\necho 2");
        assert_eq!(session.lines(), ["echo 1", "echo 2"]);
        assert_eq!(session.content(), "echo 1\necho 2");
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_new_script_with_no_lines_has_nothing_to_lose() {
        let (mut session, _dir) = test_session();
        session.start_new("draft".to_string());
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.status(), "[draft]");
    }

    #[test]
    fn test_skip_run_confirmation_sources() {
        let (mut session, _dir) = test_session();
        session.assume_yes = false;
        session.config.confirm_before_run = true;
        assert!(!session.skip_run_confirmation(false));
        assert!(session.skip_run_confirmation(true));
        session.config.confirm_before_run = false;
        assert!(session.skip_run_confirmation(false));
    }
}
