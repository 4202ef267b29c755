use stale_pr_reaper::{GitHub, github::setup_github_client, parse_args, reap_stale_pull_requests};
use tracing::{info, warn};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let spec = match parse_args(std::env::args_os()) {
        Ok(spec) => spec,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let octocrab = setup_github_client(spec.github_token.as_deref())?;
    let report = reap_stale_pull_requests(&spec.repo, &GitHub::new(octocrab), &spec.options).await?;

    if spec.options.dry_run {
        info!(
            "Dry run: {} of {} pull requests would be closed in {}",
            report.stale.len(),
            report.fetched,
            spec.repo
        );
    } else {
        info!(
            "Closed {} of {} pull requests in {}",
            report.closed.len(),
            report.fetched,
            spec.repo
        );
    }

    if !report.failed_branch_deletions.is_empty() {
        warn!(
            "{} branch(es) left behind: {}",
            report.failed_branch_deletions.len(),
            report
                .failed_branch_deletions
                .iter()
                .map(|failure| failure.branch.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}
