//! # System Interaction Layer
//!
//! Everything that touches processes and the interpreter lives here, behind
//! the [`executor::ScriptExecutor`] contract the rest of the application uses.
//!
//! ## Modules
//!
//! - **`executor`**: The public face: `execute`, `execute_command`, `interrupt`,
//!   `validate_syntax` and `list_dependencies`.
//! - **`runner`**: Spawns the interpreter in its own process group, captures output,
//!   and enforces the timeout with a SIGTERM-then-SIGKILL escalation.
//! - **`wrapper`**: Hardens raw script text with strict mode and an EXIT trap.
//! - **`dependencies`**: An advisory regex scan for the external commands a script calls.
//! - **`interpreter`**: Locates the interpreter and other commands on `PATH`.

pub mod dependencies;
pub mod executor;
pub mod interpreter;
pub mod runner;
pub mod wrapper;
