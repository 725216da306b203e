//! Repository and run context supplied by the invoking CI platform.

use crate::error::{NotifyError, Result};

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Read-only identity of the repository, branch, commit and workflow run
/// for which a notification is being sent. Collected once per invocation.
#[derive(Debug, Clone)]
pub struct RevisionContext {
    pub server_url: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub actor: String,
    pub commit_sha: String,
    pub run_id: String,
}

impl RevisionContext {
    /// Collect the context from a key/value source. `GITHUB_REPOSITORY` is
    /// expected in `owner/name` form; `GITHUB_SERVER_URL` is optional.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let repository = require(&lookup, "GITHUB_REPOSITORY")?;
        let (repo_owner, repo_name) = repository.split_once('/').ok_or_else(|| {
            NotifyError::ConfigError(format!(
                "GITHUB_REPOSITORY is not in 'owner/name' form: '{}'",
                repository
            ))
        })?;

        let server_url = lookup("GITHUB_SERVER_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Ok(Self {
            server_url,
            repo_owner: repo_owner.to_string(),
            repo_name: repo_name.to_string(),
            branch: require(&lookup, "GITHUB_REF_NAME")?,
            actor: require(&lookup, "GITHUB_ACTOR")?,
            commit_sha: require(&lookup, "GITHUB_SHA")?,
            run_id: require(&lookup, "GITHUB_RUN_ID")?,
        })
    }

    /// Collect the context from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Base URL of the repository, used for all links in the card.
    pub fn repo_url(&self) -> String {
        format!("{}/{}/{}", self.server_url, self.repo_owner, self.repo_name)
    }
}

fn require(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).ok_or_else(|| {
        NotifyError::ConfigError(format!("Missing required environment variable '{}'", key))
    })
}
