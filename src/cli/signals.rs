// src/cli/signals.rs

use anyhow::{Context, Result};
use signal_hook::{consts::SIGINT, iterator::Signals};
use std::thread;

use crate::system::executor::InterruptHandle;

/// Routes Ctrl+C to the running script instead of killing scriptdeck.
///
/// Scripts run in their own process group, so the terminal's SIGINT only
/// reaches us. A background thread passes it on to the script's group. With
/// nothing running the signal is dropped, and prompts see Ctrl+C as input
/// anyway because they read the terminal in raw mode.
pub fn install_interrupt_forwarder(handle: InterruptHandle) -> Result<()> {
    let mut signals = Signals::new([SIGINT]).context("Failed to register SIGINT handler")?;

    thread::Builder::new()
        .name("sigint-forwarder".to_string())
        .spawn(move || {
            for _ in signals.forever() {
                if handle.interrupt() {
                    log::debug!("Forwarded SIGINT to the running script");
                } else {
                    log::trace!("SIGINT received with no script running");
                }
            }
        })
        .context("Failed to start the interrupt forwarder thread")?;

    Ok(())
}
