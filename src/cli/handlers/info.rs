// src/cli/handlers/info.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::session::Session,
    core::format::format_size,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows details about a saved script.")]
struct InfoArgs {
    /// The script to describe.
    name: String,
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let info_args = InfoArgs::try_parse_from(&args)?;
    let details = session.store.script_info(info_args.name.trim())?;

    println!(
        "\n{}",
        format!(t!("info.title"), name = details.name.cyan()).bold()
    );
    print_row(t!("info.label.path"), &details.path.display().to_string());
    print_row(
        t!("info.label.size"),
        &format!("{} ({} bytes)", format_size(details.size), details.size),
    );
    print_row(t!("info.label.lines"), &details.line_count.to_string());
    print_row(t!("info.label.permissions"), &details.permissions);
    print_row(
        t!("info.label.modified"),
        &details.modified.format(TIME_FORMAT).to_string(),
    );

    match &details.metadata {
        Some(meta) => {
            print_row(t!("info.label.created"), &meta.created.format(TIME_FORMAT).to_string());
            let accessed = meta
                .accessed
                .map(|a| a.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string());
            print_row(t!("info.label.accessed"), &accessed);
            if !meta.hash.is_empty() {
                print_row(t!("info.label.hash"), &meta.hash);
            }
        }
        None => println!("  {}", t!("info.info.no_metadata").dimmed()),
    }
    Ok(())
}

fn print_row(label: &str, value: &str) {
    println!("  {:<14} {}", format!("{}:", label).bold(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::tests::test_session;

    #[test]
    fn test_info_for_saved_and_missing_scripts() {
        let (mut session, _dir) = test_session();
        session.store.save_script("described", "echo 1").unwrap();

        handle(vec!["described".to_string()], &mut session).unwrap();
        assert!(handle(vec!["missing".to_string()], &mut session).is_err());
    }
}
