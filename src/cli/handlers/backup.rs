// src/cli/handlers/backup.rs

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::{
    cli::{handlers::commons, session::Session},
    core::paths,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Copies all saved scripts into a timestamped folder.")]
struct BackupArgs {
    /// Where to put the backup. Defaults to a `backups` folder next to the script directory.
    dir: Option<String>,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let backup_args = BackupArgs::try_parse_from(&args)?;

    let dest = match &backup_args.dir {
        Some(dir) => paths::expand_path_template(dir, &std::env::current_dir()?)?,
        None => default_backup_dir(session),
    };

    let backup_path = session.store.backup(&dest)?;
    println!(
        "{}",
        commons::format_success(&format!(
            t!("backup.success.created"),
            path = backup_path.display()
        ))
    );
    Ok(())
}

/// `<script_dir>/../backups`
fn default_backup_dir(session: &Session) -> PathBuf {
    let script_dir = session.store.dir();
    script_dir
        .parent()
        .unwrap_or(script_dir)
        .join("backups")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::cli::session::tests::test_session;

    #[test]
    fn test_backup_into_explicit_dir() {
        // --- Setup ---
        let (mut session, dir) = test_session();
        session.store.save_script("one", "echo 1").unwrap();
        let dest = dir.path().join("elsewhere");

        // --- Execute ---
        handle(vec![dest.display().to_string()], &mut session).unwrap();

        // --- Assert ---
        let folders: Vec<_> = fs::read_dir(&dest).unwrap().collect();
        assert_eq!(folders.len(), 1);
    }

    #[test]
    fn test_backup_default_location_is_next_to_scripts() {
        let (mut session, dir) = test_session();
        session.store.save_script("one", "echo 1").unwrap();

        handle(vec![], &mut session).unwrap();

        assert!(dir.path().join("backups").is_dir());
    }
}
