// src/cli/handlers/new.rs

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{editor, handlers::commons, session::Session},
    core::store,
};

// --- Command Argument Parsing ---

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Starts a new script and opens the editor.")]
struct NewArgs {
    /// Name for the new script. Asked for when omitted.
    name: Option<String>,
}

// --- Main Handler ---

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let new_args = NewArgs::try_parse_from(&args)?;

    if !commons::check_unsaved_changes(session)? {
        return Ok(());
    }

    let name = match new_args.name {
        Some(name) => name,
        None => match commons::prompt_script_name()? {
            Some(name) => name,
            None => return Ok(()),
        },
    };
    let name = store::validate_script_name(&name)?.to_string();

    session.start_new(name.clone());
    println!(
        "{}",
        commons::format_success(&format!(t!("new.success.created"), name = name))
    );

    if let Some(lines) = editor::edit_lines(&[], session.config.highlight)? {
        session.set_lines(lines);
    }
    Ok(())
}
