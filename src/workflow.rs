//! # Git Workflow Controller
//!
//! Runs the full reconciliation lifecycle for one repository:
//!
//! clone → load policy → (optional base-branch checkout) → create working
//! branch → per-file materialize/stage/commit → push → pull request →
//! reviewers → teardown.
//!
//! ## Design
//!
//! - All process-wide toggles (commit signing, whether to push at all)
//!   live in an explicit [`SyncOptions`] struct handed to the [`Syncer`]
//!   at construction. Nothing here reads ambient global state.
//!
//! - The local clone is owned by a [`WorkingCopy`] guard whose `Drop`
//!   deletes the directory. Teardown therefore happens on every exit
//!   path (success, any failure branch, or an early return), which is
//!   the one resource-safety invariant this module must keep.
//!
//! - Reviewer assignment is a tagged choice ([`ReviewerChoice`]): exactly
//!   one of explicit group, explicit users, or the global default team is
//!   active for a pull request, resolved once per repository. The three
//!   sources are never combined.
//!
//! Any failure aborts only the current repository's pass; the
//! reconciliation driver logs it and moves on to the next repository.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::GlobalConfig;
use crate::error::Result;
use crate::git::{self, Committer};
use crate::github::{CodeHost, NewPullRequest};
use crate::materialize;
use crate::policy::{self, RepositoryPolicy};
use crate::template;

/// Fixed name of the working branch for managed-file updates.
pub const MANAGED_FILES_BRANCH: &str = "managed-files";

/// Fixed name of the working branch for license updates.
pub const LICENSE_BRANCH: &str = "update-license";

/// Name of the license template and of the canonical license file.
pub const LICENSE_FILE: &str = "LICENSE";

/// Legacy license filenames removed when the canonical LICENSE is
/// written.
pub const LICENSE_ALTERNATES: [&str; 5] = [
    "LICENSE_APACHE",
    "LICENSE.txt",
    "LICENSE.md",
    "license-apache",
    "License",
];

/// Everything the workflow controller needs to know about the run.
///
/// Built once from CLI flags and shared by all repositories in the pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Organization the repositories live in.
    pub org: String,
    /// Token used for authenticated clone/push remotes.
    pub github_token: String,
    /// Commit identity for unsigned commits and author metadata.
    pub committer: Committer,
    /// Default review team, also granted push access on each repository
    /// that gets a pull request.
    pub review_team: String,
    /// Directory holding the template files named by the central config.
    pub templates_dir: PathBuf,
    /// Root under which per-repository clone directories are created.
    pub clones_root: PathBuf,
    /// Base URL repositories are cloned from. Overridable for GitHub
    /// Enterprise (or `file://` remotes in tests).
    pub git_base: String,
    /// Sign commits with the ambient git signing configuration.
    pub sign_commits: bool,
    /// When false, stop after committing: no push, no pull request.
    pub push: bool,
}

impl SyncOptions {
    /// Remote URL without credentials, safe for logs and errors.
    fn display_remote_url(&self, repo: &str) -> String {
        format!(
            "{}/{}/{}",
            self.git_base.trim_end_matches('/'),
            self.org,
            repo
        )
    }

    /// Remote URL with the token embedded, for clone and push.
    fn remote_url(&self, repo: &str) -> String {
        let display = self.display_remote_url(repo);
        if self.github_token.is_empty() {
            return display;
        }
        match display.strip_prefix("https://") {
            Some(rest) => format!("https://{}@{}", self.github_token, rest),
            None => display,
        }
    }
}

/// Terminal state of one repository's reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every requested file was already current; nothing was committed
    /// and no pull request was opened.
    Unchanged,
    /// Changes were committed locally but pushing is disabled.
    PushSkipped,
    /// Changes were pushed and a pull request was opened.
    PullRequest { number: u64, url: String },
}

/// Which reviewers a pull request gets. Exactly one variant applies per
/// repository: an explicit group beats explicit users beats the global
/// default team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerChoice {
    Group(String),
    Users(Vec<String>),
    DefaultTeam(String),
}

impl ReviewerChoice {
    /// Resolve the choice for one repository from its policy.
    pub fn resolve(policy: &RepositoryPolicy, default_team: &str) -> Self {
        match policy.assign_group.as_deref() {
            Some(group) if !group.is_empty() => ReviewerChoice::Group(group.to_string()),
            _ if !policy.assign_users.is_empty() => {
                ReviewerChoice::Users(policy.assign_users.clone())
            }
            _ => ReviewerChoice::DefaultTeam(default_team.to_string()),
        }
    }

    /// The `(teams, users)` lists for the review request. One of the two
    /// is always empty.
    pub fn into_request(self) -> (Vec<String>, Vec<String>) {
        match self {
            ReviewerChoice::Group(group) => (vec![group], Vec::new()),
            ReviewerChoice::Users(users) => (Vec::new(), users),
            ReviewerChoice::DefaultTeam(team) => (vec![team], Vec::new()),
        }
    }
}

/// Ephemeral on-disk clone of one repository, scoped to a single
/// reconciliation pass.
///
/// The directory is keyed by repository name under the clones root, so
/// two concurrent runs against the same repository would collide; the
/// design assumes single-instance execution. Dropping the guard removes
/// the directory; a removal failure has nowhere to bubble up to and is
/// intentionally swallowed.
pub struct WorkingCopy {
    path: PathBuf,
}

impl WorkingCopy {
    fn new(clones_root: &Path, repo: &str) -> Self {
        Self {
            path: clones_root.join(repo),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Per-file commit message, with the policy's optional prefix.
fn commit_message(prefix: Option<&str>, subject: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix} Update {subject}"),
        None => format!("Update {subject}"),
    }
}

/// Drives the per-repository workflow against a [`CodeHost`].
pub struct Syncer<H> {
    host: H,
    opts: SyncOptions,
}

impl<H: CodeHost> Syncer<H> {
    pub fn new(host: H, opts: SyncOptions) -> Self {
        Self { host, opts }
    }

    /// The code host this syncer talks to (the driver paginates through
    /// it directly).
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn org(&self) -> &str {
        &self.opts.org
    }

    /// Reconcile the requested managed files in one repository.
    ///
    /// Unknown file names are logged and skipped; each changed file gets
    /// its own commit; a pull request is opened only when at least one
    /// file changed.
    pub fn sync_files(
        &self,
        repo: &str,
        files: &[String],
        cfg: &GlobalConfig,
    ) -> Result<SyncOutcome> {
        let work = self.clone_repo(repo)?;
        let policy = self.load_policy(work.path(), repo);

        // A PR targeting a non-default branch must also start from it.
        if let Some(branch) = policy.pr_target_branch.as_deref() {
            self.checkout_base(work.path(), repo, branch)?;
        }

        git::create_branch(work.path(), repo, MANAGED_FILES_BRANCH)?;

        let context = template::resolve_context(&cfg.variables, &policy.var_overrides);
        let mut changed = false;
        for name in files {
            info!(" - checking {name}");

            let Some(file) = cfg.file_info(name) else {
                warn!("unknown file {name}, skipping");
                continue;
            };

            let removed =
                materialize::materialize(work.path(), file, &self.opts.templates_dir, &context)?;
            for alternate in &removed {
                git::stage(work.path(), repo, alternate)?;
            }
            git::stage(work.path(), repo, &file.repo_path)?;

            if git::is_clean(work.path(), repo)? {
                continue;
            }
            changed = true;

            let message = commit_message(policy.commit_prefix.as_deref(), name);
            git::commit(
                work.path(),
                repo,
                &message,
                &self.opts.committer,
                self.opts.sign_commits,
            )?;
        }

        let base = self.resolve_base_branch(repo, &policy)?;

        if !changed {
            info!("{repo}: all managed files already current");
            return Ok(SyncOutcome::Unchanged);
        }

        self.push_and_pr(
            work.path(),
            repo,
            MANAGED_FILES_BRANCH,
            "Update Managed Files",
            &base,
            &policy,
        )
    }

    /// Reconcile the LICENSE file in one repository.
    ///
    /// Follows the same shape as [`Syncer::sync_files`], specialized for
    /// the single LICENSE template and its legacy alternate names.
    pub fn sync_license(&self, repo: &str, cfg: &GlobalConfig) -> Result<SyncOutcome> {
        let work = self.clone_repo(repo)?;
        let policy = self.load_policy(work.path(), repo);

        let head = git::head_branch(work.path(), repo)?;
        if let Some(branch) = policy.pr_target_branch.as_deref() {
            if branch != head {
                self.checkout_base(work.path(), repo, branch)?;
            }
        }

        git::create_branch(work.path(), repo, LICENSE_BRANCH)?;

        // Delete alternate forms first so a near-identical legacy file
        // shows up as a rename with minor changes in the diff.
        let mut removed = Vec::new();
        for alternate in LICENSE_ALTERNATES {
            if fs::remove_file(work.path().join(alternate)).is_ok() {
                removed.push(alternate);
            }
        }

        let template_text =
            fs::read_to_string(self.opts.templates_dir.join(LICENSE_FILE))?;
        let context = template::resolve_context(&cfg.variables, &policy.var_overrides);
        let content = template::render(&template_text, &context)?;
        fs::write(work.path().join(LICENSE_FILE), content)?;

        for alternate in &removed {
            git::stage(work.path(), repo, alternate)?;
        }
        git::stage(work.path(), repo, LICENSE_FILE)?;

        if git::is_clean(work.path(), repo)? {
            info!("{repo}: license already current");
            return Ok(SyncOutcome::Unchanged);
        }

        let message = commit_message(policy.commit_prefix.as_deref(), "license");
        git::commit(
            work.path(),
            repo,
            &message,
            &self.opts.committer,
            self.opts.sign_commits,
        )?;

        let base = self.resolve_base_branch(repo, &policy)?;
        self.push_and_pr(
            work.path(),
            repo,
            LICENSE_BRANCH,
            "Updated License",
            &base,
            &policy,
        )
    }

    fn clone_repo(&self, repo: &str) -> Result<WorkingCopy> {
        let work = WorkingCopy::new(&self.opts.clones_root, repo);
        git::clone_shallow(
            &self.opts.remote_url(repo),
            &self.opts.display_remote_url(repo),
            work.path(),
            repo,
        )?;
        Ok(work)
    }

    /// A broken policy file must not stop the repository's pass: log it
    /// and proceed with defaults.
    fn load_policy(&self, work_dir: &Path, repo: &str) -> RepositoryPolicy {
        match policy::load(work_dir) {
            Ok(policy) => policy,
            Err(e) => {
                warn!("{repo}: error loading repository policy, using defaults: {e}");
                RepositoryPolicy::default()
            }
        }
    }

    fn checkout_base(&self, work_dir: &Path, repo: &str, branch: &str) -> Result<()> {
        git::fetch_branch(work_dir, repo, branch)?;
        git::checkout_tracking_branch(work_dir, repo, branch)?;
        Ok(())
    }

    /// Explicit policy target branch if set, else the default branch as
    /// the code host reports it (never assumed).
    fn resolve_base_branch(&self, repo: &str, policy: &RepositoryPolicy) -> Result<String> {
        match policy.pr_target_branch.as_deref() {
            Some(branch) if !branch.is_empty() => Ok(branch.to_string()),
            _ => self.host.default_branch(&self.opts.org, repo),
        }
    }

    fn push_and_pr(
        &self,
        work_dir: &Path,
        repo: &str,
        branch: &str,
        title: &str,
        base: &str,
        policy: &RepositoryPolicy,
    ) -> Result<SyncOutcome> {
        if !self.opts.push {
            info!("{repo}: push disabled, skipping push and pull request");
            return Ok(SyncOutcome::PushSkipped);
        }

        git::push_force(work_dir, repo, branch)?;
        info!("{repo}: pushed branch {branch}");

        let pr = self.host.create_pull_request(
            &self.opts.org,
            repo,
            &NewPullRequest {
                title: title.to_string(),
                head: branch.to_string(),
                base: base.to_string(),
                maintainer_can_modify: true,
            },
        )?;
        info!("{repo}: opened pull request {}", pr.html_url);

        // Idempotent: the team may already have access.
        self.host
            .add_team_repo_permission(&self.opts.org, &self.opts.review_team, repo, "push")?;

        let (teams, users) =
            ReviewerChoice::resolve(policy, &self.opts.review_team).into_request();
        self.host
            .request_reviewers(&self.opts.org, repo, pr.number, &teams, &users)?;

        Ok(SyncOutcome::PullRequest {
            number: pr.number,
            url: pr.html_url,
        })
    }
}
