// src/cli/handlers/deps.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{handlers::commons, session::Session},
    system::interpreter,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the external commands a script appears to use.")]
struct DepsArgs {
    /// A saved script to inspect instead of the buffer.
    name: Option<String>,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let deps_args = DepsArgs::try_parse_from(&args)?;

    let report = check_dependencies(session, deps_args.name.as_deref())?;
    if report.is_empty() {
        println!("{}", commons::format_info(t!("deps.info.none_found")));
        return Ok(());
    }

    println!("\n{}", t!("deps.title").bold());
    for (command, available) in &report {
        if *available {
            println!("  {} {}", "✓".green(), command);
        } else {
            println!("  {} {}", "✗".red(), command.red());
        }
    }
    let missing = report.iter().filter(|(_, available)| !available).count();
    if missing > 0 {
        println!(
            "\n{}",
            commons::format_warning(&format!(t!("deps.warning.missing"), count = missing))
        );
    }
    println!("{}", t!("deps.info.advisory").dimmed());
    Ok(())
}

/// Each command the script appears to use, paired with whether it is on `PATH`.
fn check_dependencies(session: &mut Session, name: Option<&str>) -> Result<Vec<(String, bool)>> {
    let content = match name {
        Some(name) => session.store.load_script(name.trim())?,
        None => session.content(),
    };

    Ok(session
        .executor
        .list_dependencies(&content)
        .into_iter()
        .map(|command| {
            let available = interpreter::is_executable_in_path(&command);
            (command, available)
        })
        .collect())
}
