// src/core/config.rs

use crate::core::paths::{self, PathError};
use crate::models::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to read or write config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Resolves the location of `config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(paths::get_config_file_path()?)
}

/// Loads the config at `path`. When the file doesn't exist yet, the defaults
/// are written there first so users have something to edit.
pub fn load_or_init(path: &Path) -> Result<AppConfig, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    if !path.exists() {
        let default_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, toml_string).map_err(io_err)?;
        log::debug!("Wrote default config to {}", path.display());
        return Ok(default_config);
    }

    let content = fs::read_to_string(path).map_err(io_err)?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_or_init_writes_defaults_when_missing() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        // --- Execute ---
        let config = load_or_init(&path).unwrap();

        // --- Assert ---
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        let reloaded = load_or_init(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_or_init_reads_existing_file() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "script_dir = \"/srv/scripts\"\nconfirm_before_run = false\nworking_dir = \"/tmp\"\n",
        )
        .unwrap();

        // --- Execute ---
        let config = load_or_init(&path).unwrap();

        // --- Assert ---
        assert_eq!(config.script_dir, "/srv/scripts");
        assert!(!config.confirm_before_run);
        assert_eq!(config.working_dir.as_deref(), Some("/tmp"));
        assert_eq!(config.default_timeout_secs, 30);
    }

    #[test]
    fn test_load_or_init_reports_parse_errors() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_timeout_secs = \"soon\"").unwrap();

        // --- Execute ---
        let err = load_or_init(&path).unwrap_err();

        // --- Assert ---
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
