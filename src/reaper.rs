use anyhow::Result;
use tracing::{info, warn};

use crate::{
    bots::BotLogins,
    search::create_stale_failing_renovate_pr_query,
    types::{Forge, PullRequest, Repo},
};

/// Knobs for a single reaping run.
#[derive(Debug, Clone, Default)]
pub struct ReapOptions {
    pub bots: BotLogins,
    /// Classify and log only; never close or delete anything.
    pub dry_run: bool,
}

/// A branch that could not be deleted after its pull request was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBranchDeletion {
    pub number: u64,
    pub branch: String,
    pub error: String,
}

/// What a run saw and did.
#[derive(Debug, Default)]
pub struct ReapReport {
    pub fetched: usize,
    pub stale: Vec<PullRequest>,
    pub closed: Vec<u64>,
    pub deleted_branches: Vec<String>,
    pub failed_branch_deletions: Vec<FailedBranchDeletion>,
}

/// Keeps the pull requests nobody but a bot has commented on or pushed to.
pub fn select_stale(prs: Vec<PullRequest>, bots: &BotLogins) -> Vec<PullRequest> {
    prs.into_iter().filter(|pr| pr.is_stale(bots)).collect()
}

/// Finds stale failing Renovate pull requests in `repo`, closes them and
/// deletes their branches.
///
/// A failed search or close aborts the run; pull requests closed before the
/// failure stay closed. A failed branch deletion is logged and recorded in
/// the report.
pub async fn reap_stale_pull_requests<F>(
    repo: &Repo,
    forge: &F,
    options: &ReapOptions,
) -> Result<ReapReport>
where
    F: Forge + Sync,
{
    let query = create_stale_failing_renovate_pr_query(repo);
    reap_with_query(repo, &query, forge, options).await
}

pub async fn reap_with_query<F>(
    repo: &Repo,
    query: &str,
    forge: &F,
    options: &ReapOptions,
) -> Result<ReapReport>
where
    F: Forge + Sync,
{
    info!("Fetching pull requests");
    let prs = forge.search_pull_requests(query).await?;
    let fetched = prs.len();

    let stale = select_stale(prs, &options.bots);
    info!("The number of pull requests: {}", stale.len());

    let mut report = ReapReport {
        fetched,
        ..ReapReport::default()
    };

    for pr in &stale {
        if options.dry_run {
            info!(
                "Would close pull request: title={} number={} url={} ref={}",
                pr.title, pr.number, pr.url, pr.head_ref_name
            );
            continue;
        }

        info!(
            "Closing pull request: title={} number={} url={}",
            pr.title, pr.number, pr.url
        );
        forge.close_pull_request(repo, pr.number).await?;
        report.closed.push(pr.number);

        info!("Deleting ref: title={} ref={}", pr.title, pr.head_ref_name);
        match forge.delete_branch(repo, &pr.head_ref_name).await {
            Ok(()) => report.deleted_branches.push(pr.head_ref_name.clone()),
            Err(e) => {
                warn!("Failed to delete ref: ref={}: {:#}", pr.head_ref_name, e);
                report.failed_branch_deletions.push(FailedBranchDeletion {
                    number: pr.number,
                    branch: pr.head_ref_name.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    report.stale = stale;
    Ok(report)
}
