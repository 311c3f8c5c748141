//! # Managed-Files Command
//!
//! Runs the org-wide managed-files pass: every repository whose
//! `managed-files` custom property is set gets its declared files
//! checked against the current templates, with a pull request opened
//! where anything drifted. Per-repository failures are logged and
//! skipped; only enumeration or configuration failures abort the
//! command.

use anyhow::Result;
use clap::Args;

use repo_steward::reconcile;

use crate::cli::GlobalArgs;

/// Update all managed files across the org
#[derive(Args, Debug)]
pub struct ManagedFilesArgs {}

/// Execute the `managed-files` command.
pub fn execute(global: &GlobalArgs, _args: ManagedFilesArgs) -> Result<()> {
    let cfg = global.load_config()?;
    let syncer = global.build_syncer()?;
    reconcile::managed_files(&syncer, &cfg)?;
    Ok(())
}
