// src/bin/scriptdeck.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use scriptdeck::{
    cli::{Cli, dispatcher, handlers, repl, session::Session, signals},
    core::config,
    system::interpreter,
};
use scriptdeck::t;
use std::env;

/// The main entry point of `scriptdeck`.
/// It sets up logging, loads the configuration, builds the session and hands
/// off to either one command or the interactive loop, with centralized error
/// handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        if let Some(clap_error) = e.downcast_ref::<clap::Error>() {
            clap_error.exit();
        }
        // An interrupted prompt ends quietly, like a shell.
        if e
            .downcast_ref::<dialoguer::Error>()
            .is_some_and(handlers::commons::is_interrupted)
        {
            std::process::exit(130);
        }
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut app_config = config::load_or_init(&config_path)?;
    cli.apply_overrides(&mut app_config);

    if let Err(message) = interpreter::check_availability(&app_config.interpreter) {
        eprintln!(
            "{} {}",
            "⚠".yellow().bold(),
            format!(t!("main.warning.interpreter_missing"), error = message).yellow()
        );
    }

    let base_dir = env::current_dir().context("Failed to read the current directory")?;
    let mut session = Session::from_config(app_config, &base_dir)?;
    session.assume_yes = cli.yes;

    signals::install_interrupt_forwarder(session.executor.interrupt_handle())?;

    if cli.args.is_empty() {
        repl::run(&mut session)
    } else {
        dispatcher::dispatch(cli.args, &mut session)
    }
}
