// src/cli/handlers/execute.rs

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{handlers::commons, session::Session},
    models::ExecutionResult,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Executes a saved script.")]
struct ExecuteArgs {
    /// The saved script to run.
    name: String,

    /// Timeout in seconds. Defaults to the configured timeout.
    #[arg(long, short = 't', value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Run without asking for confirmation.
    #[arg(long, short = 'y')]
    yes: bool,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    execute_saved(args, session).map(drop)
}

fn execute_saved(args: Vec<String>, session: &mut Session) -> Result<Option<ExecutionResult>> {
    let execute_args = ExecuteArgs::try_parse_from(&args)?;
    let name = execute_args.name.trim();

    let content = session.store.load_script(name)?;
    commons::execute_and_report(
        session,
        name,
        &content,
        execute_args.timeout,
        execute_args.yes,
    )
}
