//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the atelier binary.

mod check;
mod commands;
mod generate;
mod history;
mod progress;

pub use check::handle_check_command;
pub use commands::{Cli, Commands};
pub use generate::handle_generate_command;
pub use history::handle_history_command;
pub use progress::SpinnerObserver;
