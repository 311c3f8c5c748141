//! # Version-Control Capability
//!
//! Thin wrappers over the system `git` command, covering exactly the
//! operations the workflow controller needs: shallow clone, shallow
//! branch fetch, tracking checkout, force branch creation, staging,
//! status, commit (signed or unsigned), and force push.
//!
//! Using the system git command means authentication automatically
//! follows the environment:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens embedded in the remote URL
//! - Any configuration in ~/.gitconfig (including the signing key for
//!   signed commits)
//!
//! Error values carry the failing subcommand and captured stderr for the
//! repository being processed. Clone errors are scrubbed so the access
//! token embedded in the authenticated remote URL never reaches logs.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Commit author/committer identity, applied with `-c user.name`/
/// `-c user.email` so working copies need no local git configuration.
#[derive(Debug, Clone)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Run a git subcommand in `dir`, mapping a non-zero exit to
/// [`Error::GitCommand`] with captured stderr.
fn run(dir: &Path, repo: &str, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            repo: repo.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            repo: repo.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Clone a repository shallowly (depth 1, single branch).
///
/// `url` may embed an access token; `display_url` is the equivalent
/// without credentials and is substituted into any error output.
pub fn clone_shallow(url: &str, display_url: &str, target_dir: &Path, repo: &str) -> Result<()> {
    // git won't clone into an existing non-empty dir; a leftover from a
    // prior interrupted run is stale by definition
    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }

    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let output = Command::new("git")
        .args(["clone", "--depth=1", "--single-branch", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            repo: repo.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).replace(url, display_url);

        // Provide a helpful error message for common auth failures
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("could not read Username")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure the token has access to the repository.\n\
                Error: {}",
                stderr
            )
        } else {
            stderr
        };

        return Err(Error::GitClone {
            repo: repo.to_string(),
            message,
        });
    }

    Ok(())
}

/// Fetch a single branch from origin, shallowly. "Already up to date" is
/// a success.
pub fn fetch_branch(dir: &Path, repo: &str, branch: &str) -> Result<()> {
    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    run(dir, repo, &["fetch", "--depth=1", "origin", &refspec])?;
    Ok(())
}

/// Check out `branch`, creating or resetting a local branch that tracks
/// `origin/<branch>`.
pub fn checkout_tracking_branch(dir: &Path, repo: &str, branch: &str) -> Result<()> {
    let upstream = format!("origin/{branch}");
    run(
        dir,
        repo,
        &["checkout", "-B", branch, "--track", &upstream],
    )?;
    Ok(())
}

/// Create the working branch at the current HEAD and switch to it.
///
/// Force-creates (`-B`): a leftover local branch with the same name from
/// a previous failed run is overwritten.
pub fn create_branch(dir: &Path, repo: &str, branch: &str) -> Result<()> {
    run(dir, repo, &["checkout", "-B", branch])?;
    Ok(())
}

/// Stage one path, including a deletion of it.
pub fn stage(dir: &Path, repo: &str, path: &str) -> Result<()> {
    run(dir, repo, &["add", "--all", "--", path])?;
    Ok(())
}

/// Whether the working copy has no staged or unstaged changes.
///
/// Checked after staging a rendered file: clean means the rendered
/// content is byte-identical to what is already committed, so the commit
/// for that file is skipped.
pub fn is_clean(dir: &Path, repo: &str) -> Result<bool> {
    let stdout = run(dir, repo, &["status", "--porcelain"])?;
    Ok(stdout.trim().is_empty())
}

/// Commit the staged changes, signed or unsigned.
///
/// Signing uses the key configured in the surrounding git environment.
pub fn commit(
    dir: &Path,
    repo: &str,
    message: &str,
    committer: &Committer,
    signed: bool,
) -> Result<()> {
    let user_name = format!("user.name={}", committer.name);
    let user_email = format!("user.email={}", committer.email);
    let sign_flag = if signed { "-S" } else { "--no-gpg-sign" };
    run(
        dir,
        repo,
        &[
            "-c", &user_name, "-c", &user_email, "commit", sign_flag, "-m", message,
        ],
    )?;
    Ok(())
}

/// Force-push the working branch to origin.
///
/// Force, because a stale unmerged branch from a prior run may already
/// exist at the same name. This is only called after local commits were
/// created, so a remote answering "everything up-to-date" means local
/// change detection and the remote disagree, surfaced as
/// [`Error::PushOutOfSync`].
pub fn push_force(dir: &Path, repo: &str, branch: &str) -> Result<()> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["push", "--force", "origin", branch])
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("push --force origin {branch}"),
            repo: repo.to_string(),
            stderr: e.to_string(),
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: format!("push --force origin {branch}"),
            repo: repo.to_string(),
            stderr: stderr.into_owned(),
        });
    }

    if stderr.contains("Everything up-to-date") {
        return Err(Error::PushOutOfSync {
            repo: repo.to_string(),
        });
    }

    Ok(())
}

/// Short name of the branch HEAD points at.
///
/// Fails with [`Error::HeadNotBranch`] on a detached HEAD, since the
/// license flow derives the repository's default branch from it.
pub fn head_branch(dir: &Path, repo: &str) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["symbolic-ref", "--short", "HEAD"])
        .output()
        .map_err(|e| Error::GitCommand {
            command: "symbolic-ref --short HEAD".to_string(),
            repo: repo.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::HeadNotBranch {
            repo: repo.to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
