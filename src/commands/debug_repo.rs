//! # Debug-Repo Command
//!
//! Single-repository mode: reconcile an explicitly named repository with
//! an explicit list of managed files, bypassing the org-wide property
//! enumeration. Useful for debugging a repository's policy file or a new
//! template against one target before rolling it out.

use anyhow::Result;
use clap::Args;

use repo_steward::workflow::SyncOutcome;

use crate::cli::GlobalArgs;

/// Process a single repo for debugging
#[derive(Args, Debug)]
pub struct DebugRepoArgs {
    /// The repo to debug (ex: widget-service)
    #[arg(long, value_name = "REPO")]
    pub repo: String,

    /// The file(s) to check in the repo. Use the flag multiple times for
    /// multiple files
    #[arg(long = "file", value_name = "FILE")]
    pub files: Vec<String>,
}

/// Execute the `debug-repo` command.
pub fn execute(global: &GlobalArgs, args: DebugRepoArgs) -> Result<()> {
    let cfg = global.load_config()?;
    let syncer = global.build_syncer()?;

    match syncer.sync_files(&args.repo, &args.files, &cfg)? {
        SyncOutcome::Unchanged => println!("{}: nothing to do", args.repo),
        SyncOutcome::PushSkipped => println!("{}: changes committed, push disabled", args.repo),
        SyncOutcome::PullRequest { url, .. } => println!("{}: opened {url}", args.repo),
    }

    Ok(())
}
