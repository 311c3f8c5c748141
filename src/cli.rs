//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use repo_steward::config::GlobalConfig;
use repo_steward::defaults;
use repo_steward::git::Committer;
use repo_steward::github::GitHubClient;
use repo_steward::workflow::{SyncOptions, Syncer};

use crate::commands;

/// Repo Steward - Keeps known files in a repo up to date
#[derive(Parser, Debug)]
#[command(name = "repo-steward")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand, mirroring the knobs of an org-wide
/// run: where the central config and templates live, which org to
/// process, the commit identity, and the push/signing toggles.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Template config file
    #[arg(long, global = true, value_name = "FILE", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Path to the templates defined in the config
    #[arg(long, global = true, value_name = "DIR", default_value = "templates")]
    pub templates: PathBuf,

    /// The org to process
    #[arg(long, global = true, value_name = "ORG", env = "GITHUB_ORG")]
    pub github_org: Option<String>,

    /// The git user to use when making commits
    #[arg(
        long,
        global = true,
        value_name = "NAME",
        default_value = "Repo Steward"
    )]
    pub committer_name: String,

    /// The git email to use when making commits
    #[arg(
        long,
        global = true,
        value_name = "EMAIL",
        default_value = "repo-steward@users.noreply.github.com"
    )]
    pub committer_email: String,

    /// The default team assigned to PRs if a repo override is not set
    #[arg(
        long,
        global = true,
        value_name = "TEAM",
        default_value = "repo-steward-reviewers"
    )]
    pub review_team: String,

    /// The token used to auth to the GitHub API and push to repos
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        default_value = ""
    )]
    pub github_token: String,

    /// Whether or not to sign commits
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub sign_commits: bool,

    /// Whether or not to push and create the pull request
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub push: bool,

    /// Root directory for repository clones
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "REPO_STEWARD_CLONES"
    )]
    pub clones_root: Option<PathBuf>,

    /// Base URL of the GitHub API (override for GitHub Enterprise)
    #[arg(
        long,
        global = true,
        value_name = "URL",
        default_value = "https://api.github.com"
    )]
    pub api_base: String,

    /// Base URL repositories are cloned from
    #[arg(
        long,
        global = true,
        value_name = "URL",
        default_value = "https://github.com"
    )]
    pub git_base: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl GlobalArgs {
    /// Load the central template configuration.
    pub fn load_config(&self) -> Result<GlobalConfig> {
        Ok(GlobalConfig::from_file(&self.config)?)
    }

    /// Build the workflow controller from the global flags.
    pub fn build_syncer(&self) -> Result<Syncer<GitHubClient>> {
        let org = self
            .github_org
            .clone()
            .context("no organization given; set --github-org or GITHUB_ORG")?;

        let host = GitHubClient::with_api_base(&self.github_token, &self.api_base);
        let opts = SyncOptions {
            org,
            github_token: self.github_token.clone(),
            committer: Committer {
                name: self.committer_name.clone(),
                email: self.committer_email.clone(),
            },
            review_team: self.review_team.clone(),
            templates_dir: self.templates.clone(),
            clones_root: self
                .clones_root
                .clone()
                .unwrap_or_else(defaults::default_clones_root),
            git_base: self.git_base.clone(),
            sign_commits: self.sign_commits,
            push: self.push,
        };
        Ok(Syncer::new(host, opts))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update all managed files across the org
    ManagedFiles(commands::managed_files::ManagedFilesArgs),

    /// Update licenses in repos with the license flag
    License(commands::license::LicenseArgs),

    /// Process a single repo for debugging
    DebugRepo(commands::debug_repo::DebugRepoArgs),

    /// Render a template for debugging
    DebugTemplate(commands::debug_template::DebugTemplateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.global.log_level.as_str()),
        )
        .init();

        match self.command {
            Commands::ManagedFiles(args) => commands::managed_files::execute(&self.global, args),
            Commands::License(args) => commands::license::execute(&self.global, args),
            Commands::DebugRepo(args) => commands::debug_repo::execute(&self.global, args),
            Commands::DebugTemplate(args) => commands::debug_template::execute(&self.global, args),
        }
    }
}
