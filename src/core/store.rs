// src/core/store.rs

use crate::constants::{MAX_SCRIPT_NAME_LEN, METADATA_FILENAME, SCRIPT_EXTENSION};
use crate::models::{ScriptDetails, ScriptEntry, ScriptMetadata};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Length in bytes of the content digest kept in the metadata.
const HASH_TRUNCATE_LENGTH: usize = 16;

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("Invalid script name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("Script '{0}' not found")]
    NotFound(String),
}

type StoreResult<T> = Result<T, StoreError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Checks a user-supplied script name. Returns the trimmed name.
pub fn validate_script_name(name: &str) -> StoreResult<&str> {
    let trimmed = name.trim();
    let invalid = |reason: &str| StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if trimmed.contains(INVALID_NAME_CHARS) {
        return Err(invalid("name contains invalid characters"));
    }
    if RESERVED_NAMES.contains(&trimmed.to_uppercase().as_str()) {
        return Err(invalid("name is reserved"));
    }
    if trimmed.chars().count() > MAX_SCRIPT_NAME_LEN {
        return Err(invalid("name is too long (max 100 characters)"));
    }
    Ok(trimmed)
}

/// Reduces a name to the characters allowed on disk and adds the `.sh` extension.
fn sanitize_file_name(name: &str) -> Option<String> {
    let safe: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    if safe.is_empty() {
        return None;
    }
    let suffix = format!(".{}", SCRIPT_EXTENSION);
    if safe.ends_with(&suffix) {
        Some(safe)
    } else {
        Some(format!("{}{}", safe, suffix))
    }
}

fn stem_of(file_name: &str) -> &str {
    file_name
        .strip_suffix(&format!(".{}", SCRIPT_EXTENSION))
        .unwrap_or(file_name)
}

fn content_hash(content: &str) -> String {
    let hash = blake3::hash(content.as_bytes());
    let bytes = hash.as_bytes();
    hex::encode(bytes.get(..HASH_TRUNCATE_LENGTH).unwrap_or(bytes))
}

fn modified_time(metadata: &fs::Metadata) -> DateTime<Local> {
    metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now())
}

/// Saved scripts in one directory plus their `.metadata.json` sidecar.
#[derive(Debug)]
pub struct ScriptStore {
    dir: PathBuf,
    metadata: BTreeMap<String, ScriptMetadata>,
}

impl ScriptStore {
    /// Opens (and creates if needed) the script directory.
    ///
    /// A sidecar that can't be read or parsed is treated as empty; it will be
    /// rewritten on the next save.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let metadata_path = dir.join(METADATA_FILENAME);
        let metadata = match fs::read_to_string(&metadata_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!(
                    "Ignoring corrupt metadata file '{}': {}",
                    metadata_path.display(),
                    e
                );
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!(
                    "Could not read metadata file '{}': {}",
                    metadata_path.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        log::debug!(
            "Opened script store at {} ({} metadata entries)",
            dir.display(),
            metadata.len()
        );
        Ok(Self { dir, metadata })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds script `name`.
    pub fn script_path(&self, name: &str) -> StoreResult<PathBuf> {
        let file_name = sanitize_file_name(name.trim()).ok_or_else(|| StoreError::InvalidName {
            name: name.to_string(),
            reason: "no usable characters".to_string(),
        })?;
        Ok(self.dir.join(file_name))
    }

    /// The key a name is stored under: its on-disk file name without extension.
    fn key_for(&self, name: &str) -> StoreResult<String> {
        let path = self.script_path(name)?;
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(stem_of(&file_name).to_string())
    }

    fn existing_path(&self, name: &str) -> StoreResult<PathBuf> {
        let path = self.script_path(name)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::NotFound(name.trim().to_string()))
        }
    }

    fn save_metadata(&self) -> StoreResult<()> {
        let path = self.dir.join(METADATA_FILENAME);
        let json = serde_json::to_string_pretty(&self.metadata)?;
        fs::write(&path, json).map_err(io_error(&path))
    }

    /// Writes `content` as script `name`, makes it executable and records its metadata.
    pub fn save_script(&mut self, name: &str, content: &str) -> StoreResult<PathBuf> {
        let name = validate_script_name(name)?;
        let path = self.script_path(name)?;
        let key = self.key_for(name)?;

        fs::write(&path, content).map_err(io_error(&path))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(io_error(&path))?;

        let now = Local::now();
        let created = self.metadata.get(&key).map(|m| m.created).unwrap_or(now);
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.metadata.insert(
            key,
            ScriptMetadata {
                filename,
                created,
                modified: now,
                accessed: None,
                size: content.len() as u64,
                hash: content_hash(content),
            },
        );
        self.save_metadata()?;

        log::debug!("Saved script '{}' to {}", name, path.display());
        Ok(path)
    }

    /// Reads script `name` and stamps its last access time.
    pub fn load_script(&mut self, name: &str) -> StoreResult<String> {
        let path = self.existing_path(name)?;
        let content = fs::read_to_string(&path).map_err(io_error(&path))?;

        let key = self.key_for(name)?;
        if let Some(entry) = self.metadata.get_mut(&key) {
            entry.accessed = Some(Local::now());
            self.save_metadata()?;
        }
        Ok(content)
    }

    pub fn delete_script(&mut self, name: &str) -> StoreResult<()> {
        let path = self.existing_path(name)?;
        fs::remove_file(&path).map_err(io_error(&path))?;

        let key = self.key_for(name)?;
        if self.metadata.remove(&key).is_some() {
            self.save_metadata()?;
        }
        log::debug!("Deleted script {}", path.display());
        Ok(())
    }

    pub fn script_exists(&self, name: &str) -> bool {
        self.script_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// All visible `*.sh` files in the store, sorted by name. Unreadable
    /// entries are skipped.
    pub fn list_scripts(&self) -> StoreResult<Vec<ScriptEntry>> {
        let suffix = format!(".{}", SCRIPT_EXTENSION);
        let mut scripts: Vec<ScriptEntry> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if file_name.starts_with('.') || !file_name.ends_with(&suffix) {
                    return None;
                }
                let metadata = entry.metadata().ok()?;
                Some(ScriptEntry {
                    name: stem_of(&file_name).to_string(),
                    size: metadata.len(),
                    modified: modified_time(&metadata),
                    path: entry.into_path(),
                })
            })
            .collect();
        scripts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scripts)
    }

    /// Filesystem facts and stored metadata for script `name`.
    pub fn script_info(&self, name: &str) -> StoreResult<ScriptDetails> {
        let path = self.existing_path(name)?;
        let fs_metadata = fs::metadata(&path).map_err(io_error(&path))?;
        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        let key = self.key_for(name)?;

        Ok(ScriptDetails {
            name: key.clone(),
            size: fs_metadata.len(),
            permissions: format!("{:o}", fs_metadata.permissions().mode() & 0o777),
            modified: modified_time(&fs_metadata),
            line_count: content.lines().count(),
            metadata: self.metadata.get(&key).cloned(),
            path,
        })
    }

    /// Copies every script and the sidecar into a fresh timestamped folder
    /// under `dest_dir`. Returns that folder.
    pub fn backup(&self, dest_dir: &Path) -> StoreResult<PathBuf> {
        fs::create_dir_all(dest_dir).map_err(io_error(dest_dir))?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = dest_dir.join(format!("scripts_backup_{}", timestamp));
        fs::create_dir(&backup_path).map_err(io_error(&backup_path))?;

        for script in self.list_scripts()? {
            let Some(file_name) = script.path.file_name() else {
                continue;
            };
            let target = backup_path.join(file_name);
            fs::copy(&script.path, &target).map_err(io_error(&target))?;
        }

        let metadata_path = self.dir.join(METADATA_FILENAME);
        if metadata_path.is_file() {
            let target = backup_path.join(METADATA_FILENAME);
            fs::copy(&metadata_path, &target).map_err(io_error(&target))?;
        }

        log::debug!("Backed up scripts to {}", backup_path.display());
        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_script_name_rules() {
        assert_eq!(validate_script_name("  deploy ").unwrap(), "deploy");
        assert!(validate_script_name("").is_err());
        assert!(validate_script_name("   ").is_err());
        assert!(validate_script_name("a/b").is_err());
        assert!(validate_script_name("what?").is_err());
        assert!(validate_script_name("con").is_err());
        assert!(validate_script_name("LPT9").is_err());
        assert!(validate_script_name("COM10").is_ok());
        assert!(validate_script_name(&"x".repeat(101)).is_err());
        assert!(validate_script_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_script_path_sanitizes_and_adds_extension() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let store = ScriptStore::open(dir.path()).unwrap();

        // --- Execute & Assert ---
        assert_eq!(store.script_path("my script!").unwrap(), dir.path().join("myscript.sh"));
        assert_eq!(store.script_path("build.sh").unwrap(), dir.path().join("build.sh"));
        assert!(store.script_path("!!!").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();

        // --- Execute ---
        let path = store.save_script("hello", "echo hi\n").unwrap();
        let content = store.load_script("hello").unwrap();

        // --- Assert ---
        assert_eq!(content, "echo hi\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert!(store.script_exists("hello"));
        assert!(store.script_exists("hello.sh"));
    }

    #[test]
    fn test_save_keeps_created_and_tracks_access() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("job", "echo 1").unwrap();
        let first = store.script_info("job").unwrap().metadata.unwrap();

        // --- Execute ---
        store.save_script("job", "echo 22").unwrap();
        store.load_script("job").unwrap();

        // --- Assert ---
        let reopened = ScriptStore::open(dir.path()).unwrap();
        let meta = reopened.script_info("job").unwrap().metadata.unwrap();
        assert_eq!(meta.created, first.created);
        assert_eq!(meta.size, 7);
        assert_eq!(meta.filename, "job.sh");
        assert_eq!(meta.hash.len(), HASH_TRUNCATE_LENGTH * 2);
        assert_ne!(meta.hash, first.hash);
        assert!(meta.accessed.is_some());
    }

    #[test]
    fn test_delete_removes_file_and_metadata() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("gone", "true").unwrap();

        // --- Execute ---
        store.delete_script("gone").unwrap();

        // --- Assert ---
        assert!(!store.script_exists("gone"));
        assert!(matches!(store.delete_script("gone"), Err(StoreError::NotFound(_))));
        let raw = fs::read_to_string(dir.path().join(METADATA_FILENAME)).unwrap();
        assert!(!raw.contains("gone"));
    }

    #[test]
    fn test_load_missing_script_is_not_found() {
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        let err = store.load_script("nope").unwrap_err();
        assert_eq!(err.to_string(), "Script 'nope' not found");
    }

    #[test]
    fn test_list_scripts_sorted_and_filtered() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("zeta", "echo z").unwrap();
        store.save_script("alpha", "echo a").unwrap();
        fs::write(dir.path().join(".hidden.sh"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.sh"), "x").unwrap();

        // --- Execute ---
        let names: Vec<String> = store
            .list_scripts()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        // --- Assert ---
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_corrupt_metadata_is_treated_as_empty() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILENAME), "{not json").unwrap();

        // --- Execute ---
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("fresh", "echo ok").unwrap();

        // --- Assert ---
        let reopened = ScriptStore::open(dir.path()).unwrap();
        assert!(reopened.script_info("fresh").unwrap().metadata.is_some());
    }

    #[test]
    fn test_script_info_reports_file_facts() {
        let dir = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("info", "echo 1\necho 2\n").unwrap();

        let details = store.script_info("info").unwrap();

        assert_eq!(details.name, "info");
        assert_eq!(details.size, 14);
        assert_eq!(details.permissions, "755");
        assert_eq!(details.line_count, 2);
    }

    #[test]
    fn test_backup_copies_scripts_and_metadata() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let backups = tempdir().unwrap();
        let mut store = ScriptStore::open(dir.path()).unwrap();
        store.save_script("one", "echo 1").unwrap();
        store.save_script("two", "echo 2").unwrap();

        // --- Execute ---
        let backup_path = store.backup(backups.path()).unwrap();

        // --- Assert ---
        let folder = backup_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(folder.starts_with("scripts_backup_"));
        assert_eq!(fs::read_to_string(backup_path.join("one.sh")).unwrap(), "echo 1");
        assert!(backup_path.join("two.sh").is_file());
        assert!(backup_path.join(METADATA_FILENAME).is_file());
    }
}
