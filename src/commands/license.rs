//! # License Command
//!
//! Runs the org-wide license pass: every repository whose
//! `manage-license` custom property is `yes` gets its LICENSE file
//! regenerated from the central template, with legacy license filenames
//! removed. Failure isolation matches the managed-files pass.

use anyhow::Result;
use clap::Args;

use repo_steward::reconcile;

use crate::cli::GlobalArgs;

/// Update licenses in repos with the license flag
#[derive(Args, Debug)]
pub struct LicenseArgs {}

/// Execute the `license` command.
pub fn execute(global: &GlobalArgs, _args: LicenseArgs) -> Result<()> {
    let cfg = global.load_config()?;
    let syncer = global.build_syncer()?;
    reconcile::licenses(&syncer, &cfg)?;
    Ok(())
}
