// src/cli/handlers/delete.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{handlers::commons, session::Session},
    core::store::StoreError,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Deletes a saved script.")]
struct DeleteArgs {
    /// The script to delete.
    name: String,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let delete_args = DeleteArgs::try_parse_from(&args)?;
    let name = delete_args.name.trim().to_string();

    if !session.store.script_exists(&name) {
        return Err(StoreError::NotFound(name).into());
    }

    if !delete_args.yes {
        let prompt = format!(t!("delete.prompt.are_you_sure"), name = name);
        if !commons::confirm_unless_assumed(session, &prompt, false)? {
            println!("{}", commons::format_info(t!("common.info.operation_cancelled")));
            return Ok(());
        }
    }

    session.store.delete_script(&name)?;
    log::info!("Deleted script '{}'", name);
    println!(
        "{}",
        commons::format_success(&format!(t!("delete.success.deleted"), name = name.yellow()))
    );

    if session.name() == Some(name.as_str()) {
        session.forget();
        println!("{}", commons::format_info(t!("delete.info.buffer_cleared")));
    }
    Ok(())
}
