//! # Code-Hosting Capability
//!
//! The [`CodeHost`] trait is the contract the reconciliation core depends
//! on: listing organization repositories with their custom properties,
//! resolving a repository's default branch, opening pull requests,
//! requesting reviewers, and granting the review team access.
//!
//! [`GitHubClient`] is the production implementation, a blocking REST
//! client over `ureq` (the whole tool is sequential and blocking; there
//! is no async boundary to feed). The API base is configurable for
//! GitHub Enterprise installs; tests inject their own `CodeHost`
//! implementations instead of talking HTTP.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page size used for the organization property listing.
pub const PER_PAGE: u32 = 100;

/// One custom property on a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomProperty {
    pub property_name: String,
    /// GitHub omits the value for unset properties.
    #[serde(default)]
    pub value: Option<String>,
}

/// A repository with its custom property values, as returned by the
/// organization listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoProperties {
    pub repository_name: String,
    #[serde(default)]
    pub properties: Vec<CustomProperty>,
}

impl RepoProperties {
    /// Value of a named property, if set.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.property_name == name)
            .and_then(|p| p.value.as_deref())
    }
}

/// One page of the organization property listing.
#[derive(Debug, Clone)]
pub struct PropertyPage {
    pub repos: Vec<RepoProperties>,
    pub has_next: bool,
}

/// Request payload for opening a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub maintainer_can_modify: bool,
}

/// The created pull request, trimmed to the fields the workflow uses.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Contract the reconciliation core depends on. Implemented by
/// [`GitHubClient`] in production and by recording fakes in tests.
pub trait CodeHost {
    /// List one page of the organization's repositories with their custom
    /// property values.
    fn list_repo_properties(&self, org: &str, page: u32) -> Result<PropertyPage>;

    /// The repository's default branch as configured on the host.
    fn default_branch(&self, org: &str, repo: &str) -> Result<String>;

    /// Open a pull request.
    fn create_pull_request(&self, org: &str, repo: &str, pr: &NewPullRequest)
        -> Result<PullRequest>;

    /// Request review from teams and/or users on an open pull request.
    fn request_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        teams: &[String],
        users: &[String],
    ) -> Result<()>;

    /// Grant a team a permission on a repository. Idempotent on the
    /// GitHub side: granting an existing permission succeeds.
    fn add_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        repo: &str,
        permission: &str,
    ) -> Result<()>;
}

/// Blocking GitHub REST API client.
pub struct GitHubClient {
    agent: ureq::Agent,
    api_base: String,
    token: String,
}

impl GitHubClient {
    /// Client against api.github.com.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, "https://api.github.com")
    }

    /// Client against a custom API base (GitHub Enterprise).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.api_base, path);
        let mut req = self
            .agent
            .request(method, &url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
            .set("User-Agent", concat!("repo-steward/", env!("CARGO_PKG_VERSION")));
        if !self.token.is_empty() {
            req = req.set("Authorization", &format!("Bearer {}", self.token));
        }
        req
    }
}

/// Map a transport or HTTP-status failure to [`Error::Api`], pulling the
/// response body into the message where one exists.
fn api_err(operation: &str, err: ureq::Error) -> Error {
    let message = match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            format!("HTTP {code}: {}", body.trim())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    Error::Api {
        operation: operation.to_string(),
        message,
    }
}

/// Map a body-decoding failure to [`Error::Api`].
fn decode_err(operation: &str, err: std::io::Error) -> Error {
    Error::Api {
        operation: operation.to_string(),
        message: format!("decoding response: {err}"),
    }
}

impl CodeHost for GitHubClient {
    fn list_repo_properties(&self, org: &str, page: u32) -> Result<PropertyPage> {
        let operation = "list repository properties";
        let repos: Vec<RepoProperties> = self
            .request("GET", &format!("/orgs/{org}/properties/values"))
            .query("per_page", &PER_PAGE.to_string())
            .query("page", &page.to_string())
            .call()
            .map_err(|e| api_err(operation, e))?
            .into_json()
            .map_err(|e| decode_err(operation, e))?;

        // No Link-header parsing: a full page means there may be more.
        let has_next = repos.len() == PER_PAGE as usize;
        Ok(PropertyPage { repos, has_next })
    }

    fn default_branch(&self, org: &str, repo: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Repo {
            default_branch: String,
        }

        let operation = "get repository";
        let info: Repo = self
            .request("GET", &format!("/repos/{org}/{repo}"))
            .call()
            .map_err(|e| api_err(operation, e))?
            .into_json()
            .map_err(|e| decode_err(operation, e))?;
        Ok(info.default_branch)
    }

    fn create_pull_request(
        &self,
        org: &str,
        repo: &str,
        pr: &NewPullRequest,
    ) -> Result<PullRequest> {
        let operation = "create pull request";
        self.request("POST", &format!("/repos/{org}/{repo}/pulls"))
            .send_json(pr)
            .map_err(|e| api_err(operation, e))?
            .into_json()
            .map_err(|e| decode_err(operation, e))
    }

    fn request_reviewers(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        teams: &[String],
        users: &[String],
    ) -> Result<()> {
        self.request(
            "POST",
            &format!("/repos/{org}/{repo}/pulls/{number}/requested_reviewers"),
        )
        .send_json(serde_json::json!({
            "team_reviewers": teams,
            "reviewers": users,
        }))
        .map_err(|e| api_err("request reviewers", e))?;
        Ok(())
    }

    fn add_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        repo: &str,
        permission: &str,
    ) -> Result<()> {
        self.request("PUT", &format!("/orgs/{org}/teams/{team}/repos/{org}/{repo}"))
            .send_json(serde_json::json!({ "permission": permission }))
            .map_err(|e| api_err("grant team repository access", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_properties_deserialize() {
        let json = r#"
        [
            {
                "repository_id": 1,
                "repository_name": "widget-service",
                "repository_full_name": "acme/widget-service",
                "properties": [
                    {"property_name": "managed-files", "value": "ci,group:security"},
                    {"property_name": "manage-license", "value": "yes"}
                ]
            },
            {
                "repository_id": 2,
                "repository_name": "empty-repo",
                "properties": [
                    {"property_name": "managed-files", "value": null}
                ]
            }
        ]"#;

        let repos: Vec<RepoProperties> = serde_json::from_str(json).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].repository_name, "widget-service");
        assert_eq!(
            repos[0].property("managed-files"),
            Some("ci,group:security")
        );
        assert_eq!(repos[0].property("manage-license"), Some("yes"));
        assert_eq!(repos[1].property("managed-files"), None);
        assert_eq!(repos[1].property("unset"), None);
    }

    #[test]
    fn test_pull_request_deserialize() {
        let json = r#"{"number": 42, "html_url": "https://github.com/acme/widget/pull/42", "state": "open"}"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.html_url, "https://github.com/acme/widget/pull/42");
    }

    #[test]
    fn test_new_pull_request_serialize_shape() {
        let pr = NewPullRequest {
            title: "Update Managed Files".to_string(),
            head: "managed-files".to_string(),
            base: "main".to_string(),
            maintainer_can_modify: true,
        };
        let value = serde_json::to_value(&pr).unwrap();
        assert_eq!(value["title"], "Update Managed Files");
        assert_eq!(value["head"], "managed-files");
        assert_eq!(value["base"], "main");
        assert_eq!(value["maintainer_can_modify"], true);
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let client = GitHubClient::with_api_base("t", "https://ghe.example.com/api/v3/");
        assert_eq!(client.api_base, "https://ghe.example.com/api/v3");
    }
}
