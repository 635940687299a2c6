//! Command-line interface for DBC file manipulation.
//!
//! This binary provides a CLI tool for converting between the DBC text
//! format and its JSON projection.

mod commands;

use clap::Parser;
use commands::{Cli, execute_command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute_command(cli.command) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
