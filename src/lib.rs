//! Stale PR reaper: closes failing dependency-update pull requests that no
//! human has touched.
//!
//! Searches a repository for open pull requests opened by the Renovate bot
//! more than a week ago whose CI is failing, keeps the ones where every
//! comment and commit came from a known bot account, then closes each of
//! them and deletes its head branch.

pub mod bots;
pub mod cli;
pub mod github;
pub mod graphql;
pub mod reaper;
pub mod search;
pub mod types;

pub use bots::{BotLogins, DEFAULT_BOT_LOGINS, is_commented_by_human, is_committed_by_human};
pub use cli::{RunSpec, parse_args};
pub use github::GitHub;
pub use reaper::{FailedBranchDeletion, ReapOptions, ReapReport, reap_stale_pull_requests};
pub use search::{
    SearchQueryBuilder, create_search_pr_query, create_stale_failing_renovate_pr_query,
    create_stale_failing_renovate_pr_query_at, format_date,
};
pub use types::{
    CommentInfo, CommitInfo, Forge, PullRequest, Repo, RepoError, SearchState, SearchStatus,
};
