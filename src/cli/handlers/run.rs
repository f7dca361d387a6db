// src/cli/handlers/run.rs

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{handlers::commons, session::Session},
    models::ExecutionResult,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Executes the script in the buffer.")]
struct RunArgs {
    /// Timeout in seconds. Defaults to the configured timeout.
    #[arg(long, short = 't', value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Run without asking for confirmation.
    #[arg(long, short = 'y')]
    yes: bool,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    run_buffer(args, session).map(drop)
}

fn run_buffer(args: Vec<String>, session: &mut Session) -> Result<Option<ExecutionResult>> {
    let run_args = RunArgs::try_parse_from(&args)?;

    if session.is_empty() {
        println!("{}", commons::format_error(t!("run.error.no_script")));
        return Ok(None);
    }

    let label = session.name().unwrap_or(t!("run.label.current")).to_string();
    let content = session.content();
    commons::execute_and_report(session, &label, &content, run_args.timeout, run_args.yes)
}
