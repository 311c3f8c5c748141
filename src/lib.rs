//! # Repo Steward Library
//!
//! Core functionality for keeping centrally templated files in sync
//! across the repositories of an organization. The `repo-steward`
//! command-line tool is a thin wrapper over this library.
//!
//! ## Core Concepts
//!
//! - **Central configuration (`config`)**: which files are managed, how
//!   they group together, and the global default template variables.
//! - **Variable resolution (`template`)**: layering of built-in
//!   non-overridable keys, global defaults, and per-repository overrides
//!   into the context a template renders with.
//! - **Repository policy (`policy`)**: optional per-repository file
//!   controlling PR target branch, reviewers, commit prefix, and
//!   variable overrides.
//! - **Materialization (`materialize`)**: rendering a managed file into
//!   a working copy, removing superseded legacy paths first.
//! - **Workflow (`workflow`)**: the per-repository state machine:
//!   clone, branch, per-file commit, push, pull request, reviewers,
//!   with guaranteed working-copy teardown.
//! - **Reconciliation (`reconcile`)**: org-wide enumeration driving the
//!   workflow across many repositories with per-repository failure
//!   isolation.
//! - **Capabilities (`git`, `github`)**: the version-control and
//!   code-hosting operations the workflow depends on; `github` exposes
//!   the `CodeHost` trait so tests can substitute the host.
//!
//! ## Execution Flow
//!
//! An org-wide pass paginates the organization's repositories, reads the
//! `managed-files` custom property of each, expands `group:` tokens, and
//! runs the workflow per repository. A repository that is already fully
//! current ends in the nothing-to-do terminal state: no commit, no push,
//! no pull request.
//!
//! ## Quick Example
//!
//! ```
//! use repo_steward::config::GlobalConfig;
//!
//! let cfg = GlobalConfig::parse(r#"
//! groups:
//!   - name: security
//!     templates: [dependabot]
//! files:
//!   - name: dependabot
//!     template_name: dependabot.yml
//!     repo_path: .github/dependabot.yml
//! variables:
//!   CGO_ENABLED: "0"
//! "#).unwrap();
//!
//! assert_eq!(cfg.expand_group("security").unwrap(), ["dependabot"]);
//! assert_eq!(cfg.file_info("dependabot").unwrap().repo_path, ".github/dependabot.yml");
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod github;
pub mod materialize;
pub mod policy;
pub mod reconcile;
pub mod template;
pub mod workflow;
