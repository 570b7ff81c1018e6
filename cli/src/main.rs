//! DCIM - inconsistency measures for relational data under denial constraints.
//!
//! This is the entry point for the `dcim` binary.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dcim_cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dcim=info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dcim_cli::run(Cli::parse())
}
