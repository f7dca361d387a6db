use anyhow::{Result, anyhow};

use crate::cli::{handlers, session::Session};

// --- Command Definition and Registry ---

/// A command, its aliases, and the handler that implements it.
pub struct CommandDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut Session) -> Result<()>,
}

/// The single source of truth for all commands, shared by the REPL and
/// one-shot mode.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "new",
        aliases: &[],
        handler: handlers::new::handle,
    },
    CommandDefinition {
        name: "edit",
        aliases: &[],
        handler: handlers::edit::handle,
    },
    CommandDefinition {
        name: "save",
        aliases: &[],
        handler: handlers::save::handle,
    },
    CommandDefinition {
        name: "load",
        aliases: &["open"],
        handler: handlers::load::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "delete",
        aliases: &["del", "rm"],
        handler: handlers::delete::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "execute",
        aliases: &["exec"],
        handler: handlers::execute::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["cat"],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "clear",
        aliases: &[],
        handler: handlers::clear::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &["validate"],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "deps",
        aliases: &[],
        handler: handlers::deps::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "backup",
        aliases: &[],
        handler: handlers::backup::handle,
    },
    CommandDefinition {
        name: "help",
        aliases: &["?"],
        handler: handlers::help::handle,
    },
    CommandDefinition {
        name: "exit",
        aliases: &["quit"],
        handler: handlers::exit::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Every name and alias, for tab completion.
pub fn command_words() -> impl Iterator<Item = &'static str> {
    COMMAND_REGISTRY
        .iter()
        .flat_map(|cmd| std::iter::once(cmd.name).chain(cmd.aliases.iter().copied()))
}

/// Runs `all_args[0]` with the remaining arguments.
pub fn dispatch(all_args: Vec<String>, session: &mut Session) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some((name, rest)) = all_args.split_first() else {
        return Ok(());
    };
    let command = find_command(&name.to_lowercase())
        .ok_or_else(|| anyhow!(t!("dispatch.error.unknown_command"), name = name))?;
    (command.handler)(rest.to_vec(), session)
}
