// src/cli/handlers/show.rs

use anyhow::Result;
use clap::Parser;

use crate::cli::{handlers::commons, session::Session};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows the script in the buffer.")]
struct ShowArgs {}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    ShowArgs::try_parse_from(&args)?;

    if session.is_empty() {
        println!("{}", commons::format_info(t!("show.info.no_script")));
        return Ok(());
    }
    let title = session.name().unwrap_or(t!("run.label.current")).to_string();
    commons::show_script(&title, &session.content(), session.config.highlight);
    Ok(())
}
