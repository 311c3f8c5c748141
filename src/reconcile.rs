//! # Reconciliation Driver
//!
//! Enumerates the repositories to reconcile and runs the workflow
//! controller over each one, isolating failures: one repository's error
//! is logged and the loop continues, because org-wide reconciliation is
//! best-effort coverage across dozens of repositories in heterogeneous
//! states.
//!
//! Two org-wide passes share the same shape:
//!
//! - **Managed files**: every repository whose `managed-files` custom
//!   property is set. The property value is a comma-separated list of
//!   managed-file names, where a `group:<name>` token expands to the
//!   group's declared file list (unknown group: that token is logged and
//!   skipped).
//! - **License**: every repository whose `manage-license` property is
//!   `yes`.
//!
//! Single-repository mode (an explicit repo plus file list) bypasses the
//! enumeration and is exposed directly by [`Syncer::sync_files`].

use log::{error, info, warn};

use crate::config::GlobalConfig;
use crate::error::Result;
use crate::github::CodeHost;
use crate::workflow::Syncer;

/// Custom property listing the managed files of a repository.
pub const MANAGED_FILES_PROPERTY: &str = "managed-files";

/// Custom property opting a repository into license management.
pub const MANAGE_LICENSE_PROPERTY: &str = "manage-license";

/// Expand a `managed-files` property value into managed-file names.
///
/// Tokens are comma-separated; whitespace around a token is ignored.
/// A `group:<name>` token expands, in declared order, to the group's
/// file list; a token naming an unknown group is logged and skipped
/// without affecting the rest of the value.
pub fn expand_property_value(value: &str, cfg: &GlobalConfig) -> Vec<String> {
    let mut files = Vec::new();
    for token in value.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.strip_prefix("group:") {
            Some(group) => match cfg.expand_group(group) {
                Ok(members) => files.extend(members.iter().cloned()),
                Err(e) => warn!("error expanding group {group}: {e}"),
            },
            None => files.push(token.to_string()),
        }
    }
    files
}

/// Update all managed files across the organization.
///
/// Only errors from the repository enumeration itself are returned;
/// per-repository failures are logged and skipped.
pub fn managed_files<H: CodeHost>(syncer: &Syncer<H>, cfg: &GlobalConfig) -> Result<()> {
    let mut targets: Vec<(String, Vec<String>)> = Vec::new();

    let mut page = 1;
    loop {
        let listing = syncer.host().list_repo_properties(syncer.org(), page)?;
        for repo in &listing.repos {
            if let Some(value) = repo.property(MANAGED_FILES_PROPERTY) {
                targets.push((
                    repo.repository_name.clone(),
                    expand_property_value(value, cfg),
                ));
            }
        }
        if !listing.has_next {
            break;
        }
        page += 1;
    }

    for (repo, files) in targets {
        info!("need to check {repo}");
        if let Err(e) = syncer.sync_files(&repo, &files, cfg) {
            error!("error updating {repo}: {e}");
        }
    }

    Ok(())
}

/// Update the license in every repository flagged for license
/// management. Same failure isolation as [`managed_files`].
pub fn licenses<H: CodeHost>(syncer: &Syncer<H>, cfg: &GlobalConfig) -> Result<()> {
    let mut targets: Vec<String> = Vec::new();

    let mut page = 1;
    loop {
        let listing = syncer.host().list_repo_properties(syncer.org(), page)?;
        for repo in &listing.repos {
            if repo.property(MANAGE_LICENSE_PROPERTY) == Some("yes") {
                targets.push(repo.repository_name.clone());
            }
        }
        if !listing.has_next {
            break;
        }
        page += 1;
    }

    for repo in targets {
        info!("need to check {repo}");
        if let Err(e) = syncer.sync_license(&repo, cfg) {
            error!("error updating {repo}: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GlobalConfig {
        GlobalConfig::parse(
            r#"
groups:
  - name: security
    templates:
      - dependabot
      - codeql
files:
  - name: dependabot
    template_name: dependabot.yml
    repo_path: .github/dependabot.yml
  - name: codeql
    template_name: codeql.yml
    repo_path: .github/workflows/codeql.yml
  - name: ci
    template_name: ci.yml
    repo_path: .github/workflows/ci.yml
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_expand_plain_names() {
        let files = expand_property_value("ci,dependabot", &config());
        assert_eq!(files, ["ci", "dependabot"]);
    }

    #[test]
    fn test_expand_group_token_in_declared_order() {
        let files = expand_property_value("group:security", &config());
        assert_eq!(files, ["dependabot", "codeql"]);
    }

    #[test]
    fn test_expand_mixes_groups_and_names() {
        let files = expand_property_value("ci, group:security", &config());
        assert_eq!(files, ["ci", "dependabot", "codeql"]);
    }

    #[test]
    fn test_expand_trims_whitespace() {
        let files = expand_property_value("  ci , dependabot  ", &config());
        assert_eq!(files, ["ci", "dependabot"]);
    }

    #[test]
    fn test_expand_skips_unknown_group_only() {
        let files = expand_property_value("ci,group:nope,dependabot", &config());
        assert_eq!(files, ["ci", "dependabot"]);
    }

    #[test]
    fn test_expand_skips_empty_tokens() {
        let files = expand_property_value("ci,,dependabot,", &config());
        assert_eq!(files, ["ci", "dependabot"]);
    }
}
