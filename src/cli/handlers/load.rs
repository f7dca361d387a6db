// src/cli/handlers/load.rs

use anyhow::Result;
use clap::Parser;

use crate::cli::{handlers::commons, session::Session};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Loads a saved script into the buffer.")]
struct LoadArgs {
    /// The script to load.
    name: String,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let load_args = LoadArgs::try_parse_from(&args)?;
    let name = load_args.name.trim().to_string();

    if !commons::check_unsaved_changes(session)? {
        return Ok(());
    }

    let content = session.store.load_script(&name)?;
    session.load(name.clone(), &content);

    println!(
        "{}",
        commons::format_success(&format!(t!("load.success.loaded"), name = name))
    );
    commons::show_script(&name, &content, session.config.highlight);
    Ok(())
}
