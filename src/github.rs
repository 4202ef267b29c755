use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::{Octocrab, params::repos::Reference};
use tracing::debug;

use crate::{
    graphql::{convert_search_response, create_graphql_query},
    types::{Forge, GraphQLResponse, PullRequest, Repo},
};

/// Resolves the access token: an explicit value wins, then `GITHUB_TOKEN`,
/// `GH_TOKEN`, and finally `gh auth token`.
pub fn get_github_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|token| !token.is_empty()) {
        return Ok(token.to_string());
    }

    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                debug!("using token from {}", var);
                return Ok(token.trim().to_string());
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("No token given and the gh CLI could not be run")?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token from gh CLI. Please run 'gh auth login' first");
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("Empty token returned from gh CLI");
    }

    Ok(token)
}

/// Creates an authenticated GitHub client.
pub fn setup_github_client(explicit_token: Option<&str>) -> Result<Octocrab> {
    let token =
        get_github_token(explicit_token).context("Failed to obtain GitHub authentication token")?;
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

/// [`Forge`] backed by the GitHub GraphQL and REST APIs.
#[derive(Clone)]
pub struct GitHub {
    octocrab: Octocrab,
}

impl GitHub {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn search_pull_requests(&self, query: &str) -> Result<Vec<PullRequest>> {
        let payload = create_graphql_query(query);
        let response: GraphQLResponse = self
            .octocrab
            .graphql(&payload)
            .await
            .with_context(|| format!("Search failed for query '{}'", query))?;

        convert_search_response(response)
            .with_context(|| format!("Search failed for query '{}'", query))
    }

    async fn close_pull_request(&self, repo: &Repo, number: u64) -> Result<()> {
        let route = format!("/repos/{}/{}/pulls/{}", repo.owner(), repo.name(), number);
        let body = serde_json::json!({ "state": "closed" });
        let _: serde_json::Value = self
            .octocrab
            .patch(route, Some(&body))
            .await
            .with_context(|| format!("Failed to close pull request #{} in {}", number, repo))?;
        Ok(())
    }

    async fn delete_branch(&self, repo: &Repo, branch: &str) -> Result<()> {
        self.octocrab
            .repos(repo.owner(), repo.name())
            .delete_ref(&Reference::Branch(branch.to_string()))
            .await
            .with_context(|| format!("Failed to delete heads/{} in {}", branch, repo))?;
        Ok(())
    }
}
