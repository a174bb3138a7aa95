//! CLI module - argument parsing and the overview subcommand

mod args;
pub mod overview;

pub use args::{Cli, Commands};
pub use overview::run_overview;
