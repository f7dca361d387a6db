// src/cli/handlers/edit.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use dialoguer::Editor;

use crate::cli::{editor, handlers::commons, session::Session};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Edits the current script or loads one to edit.")]
struct EditArgs {
    /// A saved script to load first. Without it, the current script is edited.
    name: Option<String>,

    /// Opens $EDITOR on the whole script instead of the line editor.
    #[arg(long, short = 'e')]
    external: bool,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let edit_args = EditArgs::try_parse_from(&args)?;

    if let Some(name) = &edit_args.name {
        if !commons::check_unsaved_changes(session)? {
            return Ok(());
        }
        let content = session.store.load_script(name)?;
        session.load(name.trim().to_string(), &content);
        println!(
            "{}",
            commons::format_success(&format!(t!("load.success.loaded"), name = name.trim()))
        );
    }

    let Some(name) = session.name().map(str::to_string) else {
        return Err(anyhow!(t!("edit.error.nothing_to_edit")));
    };
    println!(
        "{}",
        commons::format_info(&format!(t!("edit.info.editing"), name = name))
    );

    if edit_args.external {
        edit_externally(session)
    } else {
        if let Some(lines) = editor::edit_lines(session.lines(), session.config.highlight)? {
            session.set_lines(lines);
        }
        Ok(())
    }
}

fn edit_externally(session: &mut Session) -> Result<()> {
    let edited = Editor::new().extension(".sh").edit(&session.content())?;
    match edited {
        Some(content) => {
            let content = content.strip_suffix('\n').unwrap_or(&content);
            session.set_lines(content.split('\n').map(str::to_string).collect());
            println!("{}", commons::format_success(t!("editor.success.done")));
        }
        None => println!("{}", commons::format_info(t!("editor.info.cancelled"))),
    }
    Ok(())
}
