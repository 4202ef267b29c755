use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::bots::{BotLogins, is_commented_by_human, is_committed_by_human};

/// Why a string could not be turned into a [`Repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    MissingSeparator(String),
    EmptyOwner(String),
    EmptyName(String),
    TooManySegments(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::MissingSeparator(s) => {
                write!(f, "expected 'owner/name', got '{}'", s)
            }
            RepoError::EmptyOwner(s) => write!(f, "repository owner is empty in '{}'", s),
            RepoError::EmptyName(s) => write!(f, "repository name is empty in '{}'", s),
            RepoError::TooManySegments(s) => {
                write!(f, "expected exactly one '/' in '{}'", s)
            }
        }
    }
}

impl std::error::Error for RepoError {}

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();
        let full = format!("{}/{}", owner, name);

        if owner.is_empty() {
            return Err(RepoError::EmptyOwner(full));
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName(full));
        }
        if owner.contains('/') || name.contains('/') {
            return Err(RepoError::TooManySegments(full));
        }

        Ok(Self { owner, name })
    }

    /// Parses the `owner/name` form used by `GITHUB_REPOSITORY`.
    pub fn parse(s: &str) -> Result<Self, RepoError> {
        let s = s.trim();
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| RepoError::MissingSeparator(s.to_string()))?;
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Search qualifier values for `state:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Open,
}

/// Search qualifier values for `status:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Success,
    Failure,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Open => "open",
        }
    }
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Success => "success",
            SearchStatus::Failure => "failure",
        }
    }
}

/// One commit on a pull request. `author_login` is `None` when the git
/// author is not linked to a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitInfo {
    pub author_login: Option<String>,
}

/// One issue comment on a pull request. `author_login` is `None` for
/// comments left by deleted accounts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentInfo {
    pub author_login: Option<String>,
}

impl CommitInfo {
    pub fn by(login: impl Into<String>) -> Self {
        Self {
            author_login: Some(login.into()),
        }
    }
}

impl CommentInfo {
    pub fn by(login: impl Into<String>) -> Self {
        Self {
            author_login: Some(login.into()),
        }
    }
}

/// Snapshot of a candidate pull request as returned by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub head_ref_name: String,
    pub author_login: Option<String>,
    pub commits: Vec<CommitInfo>,
    pub comments: Vec<CommentInfo>,
}

impl PullRequest {
    pub fn is_commented_by_human(&self, bots: &BotLogins) -> bool {
        is_commented_by_human(&self.comments, bots)
    }

    pub fn is_committed_by_human(&self, bots: &BotLogins) -> bool {
        is_committed_by_human(&self.commits, bots)
    }

    /// True when no human has commented on or pushed to this pull request.
    pub fn is_stale(&self, bots: &BotLogins) -> bool {
        !self.is_commented_by_human(bots) && !self.is_committed_by_human(bots)
    }
}

/// The code-hosting operations the reaper needs.
///
/// Implemented by [`crate::GitHub`] for real runs and by in-memory mocks in
/// tests.
#[async_trait]
pub trait Forge {
    /// Runs a single issue search and returns the pull requests it matched.
    async fn search_pull_requests(&self, query: &str) -> Result<Vec<PullRequest>>;

    /// Moves a pull request to the closed state.
    async fn close_pull_request(&self, repo: &Repo, number: u64) -> Result<()>;

    /// Deletes `refs/heads/<branch>`.
    async fn delete_branch(&self, repo: &Repo, branch: &str) -> Result<()>;
}

/// Top-level GraphQL envelope. GitHub may return `errors` next to partial
/// `data`, so both are decoded.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<SearchData>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchResults,
}

// Nodes stay raw until conversion: issues and discussions come back as `{}`
// because only the `PullRequest` fragment selects fields, and everything
// else must decode strictly.
#[derive(Debug, Deserialize)]
pub struct SearchResults {
    pub nodes: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLPullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub head_ref_name: String,
    pub author: Option<GraphQLActor>,
    pub commits: GraphQLCommitConnection,
    pub comments: GraphQLCommentConnection,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLActor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLCommitConnection {
    pub nodes: Vec<GraphQLCommitNode>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLCommitNode {
    pub commit: GraphQLCommit,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLCommit {
    pub author: Option<GraphQLGitActor>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLGitActor {
    pub user: Option<GraphQLActor>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLCommentConnection {
    pub nodes: Vec<GraphQLComment>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLComment {
    pub author: Option<GraphQLActor>,
}
