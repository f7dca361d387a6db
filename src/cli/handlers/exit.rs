// src/cli/handlers/exit.rs

use anyhow::Result;

use crate::cli::{handlers::commons, session::Session};

pub fn handle(_args: Vec<String>, session: &mut Session) -> Result<()> {
    if commons::check_unsaved_changes(session)? {
        session.request_exit();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::tests::test_session;

    #[test]
    fn test_exit_requests_exit() {
        // --- Setup ---
        let (mut session, _dir) = test_session();
        session.set_lines(vec!["unsaved".to_string()]);
        assert!(!session.exit_requested());

        // --- Execute ---
        handle(vec![], &mut session).unwrap();

        // --- Assert ---
        assert!(session.exit_requested());
        assert!(!session.store.script_exists("unsaved"));
        assert_eq!(session.lines(), ["unsaved"]);
    }

    #[test]
    fn test_exit_with_clean_buffer() {
        let (mut session, _dir) = test_session();
        handle(vec!["ignored".to_string()], &mut session).unwrap();
        assert!(session.exit_requested());
    }
}
