// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{handlers::commons, session::Session},
    core::format::{format_size, truncate_text},
};

const NAME_WIDTH: usize = 32;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists saved scripts.")]
struct ListArgs {}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    ListArgs::try_parse_from(&args)?;

    let scripts = session.store.list_scripts()?;
    if scripts.is_empty() {
        println!("{}", commons::format_info(t!("list.info.no_scripts")));
        return Ok(());
    }

    println!("\n{}", t!("list.title").bold());
    println!(
        "{:<name_w$}  {:>9}  {}",
        t!("list.header.name").bold(),
        t!("list.header.size").bold(),
        t!("list.header.modified").bold(),
        name_w = NAME_WIDTH
    );
    for script in &scripts {
        println!(
            "{:<name_w$}  {:>9}  {}",
            truncate_text(&script.name, NAME_WIDTH).cyan(),
            format_size(script.size).magenta(),
            script.modified.format("%Y-%m-%d %H:%M").to_string().green(),
            name_w = NAME_WIDTH
        );
    }
    println!(
        "\n{}",
        format!(t!("list.info.total"), count = scripts.len()).dimmed()
    );
    Ok(())
}
