//! # Error Handling
//!
//! Centralized error handling for `repo-steward`, built on `thiserror`.
//!
//! The [`Error`] enum covers every failure mode the reconciliation pipeline
//! can hit: central configuration parsing, per-repository policy parsing,
//! git operations (clone, fetch, checkout, commit, push), template
//! rendering, and GitHub API calls.
//!
//! Two variants deserve a note:
//!
//! - [`Error::PushOutOfSync`] represents a state that should be impossible:
//!   the remote reports "already up to date" for a branch we just committed
//!   local changes to. It is surfaced as a distinct error (rather than being
//!   treated as a benign no-op) because it indicates an inconsistency
//!   between local change detection and the remote.
//!
//! - [`Error::UnknownGroup`] is produced by group expansion but downgraded
//!   to a logged warning by the reconciliation driver; an unknown group in
//!   one repository's property must not abort the org-wide pass.
//!
//! Per-repository failures are logged and isolated by the driver; only
//! top-level failures (unreadable central config, bad CLI usage) reach the
//! process exit code.

use thiserror::Error;

/// Main error type for repo-steward operations
#[derive(Error, Debug)]
pub enum Error {
    /// The central template configuration file could not be parsed.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A per-repository policy file exists but could not be parsed.
    ///
    /// Callers log this and proceed with an all-default policy; a broken
    /// policy file in one repository must not stop its reconciliation.
    #[error("Repository policy parsing error in {path}: {message}")]
    PolicyParse { path: String, message: String },

    /// A `group:<name>` token referenced a group that is not defined in the
    /// central configuration.
    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },

    /// Cloning a repository failed.
    #[error("Git clone error for {repo}: {message}")]
    GitClone { repo: String, message: String },

    /// A git command failed.
    ///
    /// Carries the repository the command ran against and the captured
    /// stderr. The command string never contains the access token.
    #[error("Git command failed for {repo}: {command} - {stderr}")]
    GitCommand {
        command: String,
        repo: String,
        stderr: String,
    },

    /// The checked-out HEAD of a working copy is not a branch, so the
    /// default branch cannot be derived from it.
    #[error("HEAD ref is not a branch for {repo}")]
    HeadNotBranch { repo: String },

    /// A push reported "already up to date" even though local commits were
    /// just created. Indicates a logic/state inconsistency between local
    /// change detection and the remote.
    #[error("Push for {repo} reported already up to date despite local commits")]
    PushOutOfSync { repo: String },

    /// A template could not be parsed, or rendering it failed (for example
    /// because a referenced variable is missing from the render context).
    #[error("Template processing error: {message}")]
    Template { message: String },

    /// A GitHub API call failed.
    #[error("GitHub API error during {operation}: {message}")]
    Api { operation: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            path: "config.yaml".to_string(),
            message: "invalid YAML".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("config.yaml"));
        assert!(display.contains("invalid YAML"));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "push --force origin managed-files".to_string(),
            repo: "example-repo".to_string(),
            stderr: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("example-repo"));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_error_display_unknown_group() {
        let error = Error::UnknownGroup {
            name: "security".to_string(),
        };
        assert_eq!(format!("{}", error), "Unknown group: security");
    }

    #[test]
    fn test_error_display_push_out_of_sync() {
        let error = Error::PushOutOfSync {
            repo: "example-repo".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("already up to date"));
        assert!(display.contains("example-repo"));
    }

    #[test]
    fn test_error_display_template() {
        let error = Error::Template {
            message: "Variable `PROJECT_NAME` not found".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Template processing error"));
        assert!(display.contains("PROJECT_NAME"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }
}
