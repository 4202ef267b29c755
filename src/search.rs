use chrono::{DateTime, TimeDelta, Utc};

use crate::types::{Repo, SearchState, SearchStatus};

/// Search author qualifier for the Renovate GitHub App.
pub const RENOVATE_AUTHOR: &str = "app/renovate";

/// Pull requests younger than this are left alone.
pub const STALE_AFTER_DAYS: i64 = 7;

/// Formats an instant the way GitHub search date qualifiers expect it:
/// whole seconds with an explicit `+00:00` offset.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}

/// Accumulates GitHub search qualifiers and joins them with single spaces,
/// in the order they were added.
#[derive(Debug, Default)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn pr_type(&mut self) -> &mut Self {
        self.terms.push("type:pr".to_string());
        self
    }

    pub fn repo(&mut self, repo: &str) -> &mut Self {
        self.terms.push(format!("repo:{}", repo));
        self
    }

    pub fn author(&mut self, author: &str) -> &mut Self {
        self.terms.push(format!("author:{}", author));
        self
    }

    pub fn created_on_or_before(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.terms.push(format!("created:<={}", format_date(date)));
        self
    }

    pub fn state(&mut self, state: SearchState) -> &mut Self {
        self.terms.push(format!("state:{}", state.as_str()));
        self
    }

    pub fn status(&mut self, status: SearchStatus) -> &mut Self {
        self.terms.push(format!("status:{}", status.as_str()));
        self
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

/// Builds a pull request search query, appending `additional_filter`
/// verbatim after a single space.
pub fn create_search_pr_query(
    repo: &str,
    author: &str,
    created_before: DateTime<Utc>,
    additional_filter: &str,
    ci_status: SearchStatus,
    pr_state: SearchState,
) -> String {
    let query = SearchQueryBuilder::new()
        .pr_type()
        .repo(repo)
        .author(author)
        .created_on_or_before(created_before)
        .state(pr_state)
        .status(ci_status)
        .build();

    format!("{} {}", query, additional_filter).trim().to_string()
}

/// Query for Renovate pull requests that have been open for at least a week
/// with failing CI, e.g.
/// `type:pr repo:owner/name author:app/renovate created:<=... state:open status:failure`.
pub fn create_stale_failing_renovate_pr_query(repo: &Repo) -> String {
    create_stale_failing_renovate_pr_query_at(repo, Utc::now())
}

pub fn create_stale_failing_renovate_pr_query_at(repo: &Repo, now: DateTime<Utc>) -> String {
    create_search_pr_query(
        &repo.to_string(),
        RENOVATE_AUTHOR,
        now - TimeDelta::days(STALE_AFTER_DAYS),
        "",
        SearchStatus::Failure,
        SearchState::Open,
    )
}
