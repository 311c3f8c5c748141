//! # Repo Steward CLI
//!
//! Binary entry point for the `repo-steward` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging from the `--log-level` flag.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into
//!   user-friendly output.
//!
//! The core application logic lives in the library crate; the binary is
//! a thin wrapper around it. Per-repository failures during an org-wide
//! pass are logged and isolated by the library and do not affect the
//! process exit code; only top-level failures do.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
