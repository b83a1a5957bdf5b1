// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod output;

pub use args::{Args, Command, SendArgs};
pub use commands::{execute_command, run_session, RunOutcome};
pub use output::ConsoleWriter;
