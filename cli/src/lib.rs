//! DCIM command-line front end.
//!
//! - `args`: clap definitions for the `measure`, `simulate` and `noise`
//!   subcommands
//! - `commands`: configuration merging and command execution
//! - `format`: output formatting utilities

mod args;
mod commands;
mod format;

pub use args::{Cli, Command, InputArgs, MeasureArgs, RunArgs};
pub use commands::{build_config, run};
pub use format::{format_measurements, format_summary};
