// src/cli/handlers/save.rs

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{handlers::commons, session::Session},
    core::store,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Saves the current script.")]
struct SaveArgs {
    /// Save under this name. Defaults to the current script's name.
    name: Option<String>,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let save_args = SaveArgs::try_parse_from(&args)?;

    if session.is_empty() {
        return Err(anyhow!(t!("save.error.nothing_to_save")));
    }

    let name = match save_args.name.or_else(|| session.name().map(str::to_string)) {
        Some(name) => name,
        None => match commons::prompt_script_name()? {
            Some(name) => name,
            None => return Ok(()),
        },
    };
    let name = store::validate_script_name(&name)?.to_string();

    let path = session.store.save_script(&name, &session.content())?;
    session.mark_saved(name.clone());
    log::debug!("Script '{}' written to {}", name, path.display());

    println!(
        "{}",
        commons::format_success(&format!(t!("save.success.saved"), name = name))
    );
    Ok(())
}
