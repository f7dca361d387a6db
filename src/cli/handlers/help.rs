// src/cli/handlers/help.rs

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::{Cli, session::Session};

pub fn handle(_args: Vec<String>, _session: &mut Session) -> Result<()> {
    println!("{}", Cli::command().render_help().ansi());
    Ok(())
}
