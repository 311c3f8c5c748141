//! # Per-Repository Policy
//!
//! A target repository may carry a policy file at its root that adjusts
//! how reconciliation treats it: which branch pull requests target, who
//! reviews them, a commit message prefix, and template variable
//! overrides.
//!
//! Two filename variants are accepted (`.repo-steward.yaml` and
//! `.repo-steward.yml`); the first that exists wins. A missing file is
//! the common case and yields an all-default policy, never an error. A
//! file that exists but fails to parse yields an error that callers log
//! and treat as "proceed with defaults". The loader never mutates the
//! working copy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Accepted policy filenames, tried in order.
pub const POLICY_FILE_NAMES: [&str; 2] = [".repo-steward.yaml", ".repo-steward.yml"];

/// Per-repository reconciliation overrides. Every field is optional;
/// `Default` is the policy of a repository with no policy file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPolicy {
    /// Branch pull requests target, and therefore the branch the working
    /// branch is created from. Unset means the repository's default
    /// branch.
    #[serde(default)]
    pub pr_target_branch: Option<String>,

    /// Individual users to request review from. Only consulted when no
    /// reviewer group is set; see `ReviewerChoice` in the workflow
    /// module.
    #[serde(default)]
    pub assign_users: Vec<String>,

    /// Team slug to request review from, taking precedence over
    /// `assign_users`.
    #[serde(default)]
    pub assign_group: Option<String>,

    /// Prefix prepended to every commit message, e.g. a ticket tag.
    #[serde(default)]
    pub commit_prefix: Option<String>,

    /// Template variable overrides applied on top of the global defaults.
    #[serde(default)]
    pub var_overrides: HashMap<String, String>,
}

/// Load the policy from a repository working copy.
///
/// Missing file is not an error; see the module docs for the exact
/// semantics.
pub fn load(work_dir: &Path) -> Result<RepositoryPolicy> {
    for name in POLICY_FILE_NAMES {
        let path = work_dir.join(name);
        if !path.exists() {
            continue;
        }
        let text = fs::read_to_string(&path)?;
        return serde_yaml::from_str(&text).map_err(|e| Error::PolicyParse {
            path: name.to_string(),
            message: e.to_string(),
        });
    }

    Ok(RepositoryPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_default_policy() {
        let temp = TempDir::new().unwrap();
        let policy = load(temp.path()).unwrap();
        assert!(policy.pr_target_branch.is_none());
        assert!(policy.assign_users.is_empty());
        assert!(policy.assign_group.is_none());
        assert!(policy.commit_prefix.is_none());
        assert!(policy.var_overrides.is_empty());
    }

    #[test]
    fn test_loads_yaml_variant() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".repo-steward.yaml"),
            "pr_target_branch: develop\ncommit_prefix: \"[deps]\"\n",
        )
        .unwrap();

        let policy = load(temp.path()).unwrap();
        assert_eq!(policy.pr_target_branch.as_deref(), Some("develop"));
        assert_eq!(policy.commit_prefix.as_deref(), Some("[deps]"));
    }

    #[test]
    fn test_falls_back_to_yml_variant() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".repo-steward.yml"),
            "assign_group: platform-reviewers\n",
        )
        .unwrap();

        let policy = load(temp.path()).unwrap();
        assert_eq!(policy.assign_group.as_deref(), Some("platform-reviewers"));
    }

    #[test]
    fn test_yaml_variant_wins_over_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".repo-steward.yaml"), "commit_prefix: A\n").unwrap();
        fs::write(temp.path().join(".repo-steward.yml"), "commit_prefix: B\n").unwrap();

        let policy = load(temp.path()).unwrap();
        assert_eq!(policy.commit_prefix.as_deref(), Some("A"));
    }

    #[test]
    fn test_all_fields_parse() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".repo-steward.yaml"),
            r#"
pr_target_branch: release
assign_users:
  - alice
  - bob
assign_group: security-team
commit_prefix: "chore:"
var_overrides:
  CGO_ENABLED: "1"
"#,
        )
        .unwrap();

        let policy = load(temp.path()).unwrap();
        assert_eq!(policy.pr_target_branch.as_deref(), Some("release"));
        assert_eq!(policy.assign_users, ["alice", "bob"]);
        assert_eq!(policy.assign_group.as_deref(), Some("security-team"));
        assert_eq!(policy.commit_prefix.as_deref(), Some("chore:"));
        assert_eq!(policy.var_overrides.get("CGO_ENABLED").unwrap(), "1");
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".repo-steward.yaml"),
            "assign_users: [unclosed\n",
        )
        .unwrap();

        let err = load(temp.path()).unwrap_err();
        assert!(matches!(err, Error::PolicyParse { .. }));
    }
}
