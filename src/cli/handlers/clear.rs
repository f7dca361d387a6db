// src/cli/handlers/clear.rs

use anyhow::Result;
use clap::Parser;

use crate::cli::{handlers::commons, session::Session};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Empties the buffer.")]
struct ClearArgs {}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    ClearArgs::try_parse_from(&args)?;

    if !session.is_empty()
        && !commons::confirm_unless_assumed(session, t!("clear.prompt.confirm"), false)?
    {
        return Ok(());
    }
    session.clear_lines();
    println!("{}", commons::format_success(t!("clear.success.cleared")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::tests::test_session;

    #[test]
    fn test_clear_keeps_name_but_drops_lines() {
        let (mut session, _dir) = test_session();
        session.load("named".to_string(), "echo x");

        handle(vec![], &mut session).unwrap();

        assert!(session.is_empty());
        assert_eq!(session.name(), Some("named"));
    }
}
