// src/system/interpreter.rs

use std::env;
use std::path::{Path, PathBuf};

/// Finds `name` the way the OS would when spawning it: used as-is when it
/// contains a path separator, otherwise searched for on `PATH`.
pub fn locate(name: &str) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let path = Path::new(name);
        return path.is_file().then(|| path.to_path_buf());
    }
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

pub fn is_executable_in_path(executable_name: &str) -> bool {
    locate(executable_name).is_some()
}

/// Checks that the configured interpreter can be found before the first run.
pub fn check_availability(interpreter: &str) -> Result<PathBuf, String> {
    locate(interpreter).ok_or_else(|| format!("'{}' not found in PATH", interpreter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_finds_bash_on_path() {
        let found = locate("bash").expect("bash is needed for the test suite");
        assert!(found.ends_with("bash"));
    }

    #[test]
    fn test_locate_accepts_absolute_paths() {
        let bash = locate("bash").unwrap();
        assert_eq!(locate(&bash.to_string_lossy()), Some(bash));
        assert_eq!(locate("/no/such/interpreter"), None);
    }

    #[test]
    fn test_check_availability_reports_missing_interpreter() {
        let err = check_availability("surely-not-a-real-shell-xyz").unwrap_err();
        assert!(err.contains("surely-not-a-real-shell-xyz"));
    }
}
