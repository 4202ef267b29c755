use std::fmt;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{bots::BotLogins, reaper::ReapOptions, types::Repo};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Default, Debug)]
#[command(
    about = "Close Renovate PRs that have been failing CI for a week without any human touching them, and delete their branches"
)]
#[command(version, long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Repository in format 'owner/repo'
    #[arg(short = 'r', long, env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Access token (falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(
        long = "github-token",
        env = "INPUT_GITHUB_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub github_token: Option<String>,

    /// Additional bot login whose activity does not count as human (can specify multiple or comma-separated)
    #[arg(
        long = "bot-login",
        env = "BOT_LOGINS",
        value_delimiter = ',',
        value_name = "LOGIN"
    )]
    pub bot_logins: Vec<String>,

    /// Log what would be closed without closing or deleting anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn validate(&self) -> Result<()> {
        if self
            .repo
            .as_deref()
            .is_none_or(|repo| repo.trim().is_empty())
        {
            anyhow::bail!("repo isn't set: pass --repo or set GITHUB_REPOSITORY");
        }

        Ok(())
    }
}

/// Everything a run needs, resolved from arguments and environment.
pub struct RunSpec {
    pub repo: Repo,
    pub github_token: Option<String>,
    pub options: ReapOptions,
}

impl fmt::Debug for RunSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSpec")
            .field("repo", &self.repo)
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("options", &self.options)
            .finish()
    }
}

fn build_run_spec(cli: CliArgs) -> Result<RunSpec> {
    cli.validate()?;

    let raw_repo = cli.repo.unwrap_or_default();
    let repo = Repo::parse(&raw_repo)
        .with_context(|| format!("Invalid repository format '{}'", raw_repo))?;

    Ok(RunSpec {
        repo,
        github_token: cli.github_token,
        options: ReapOptions {
            bots: BotLogins::with_extra(cli.bot_logins),
            dry_run: cli.dry_run,
        },
    })
}

/// Parses command-line arguments (with environment fallbacks) into a
/// [`RunSpec`].
pub fn parse_args<I, T>(args: I) -> Result<RunSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_run_spec(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_repo_is_a_config_error() {
        let err = build_run_spec(CliArgs::default()).unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }

    #[test]
    fn test_blank_repo_is_a_config_error() {
        let cli = CliArgs {
            repo: Some("  ".to_string()),
            ..CliArgs::default()
        };
        assert!(build_run_spec(cli).is_err());
    }

    #[test]
    fn test_malformed_repo_is_rejected() {
        let cli = CliArgs {
            repo: Some("just-a-name".to_string()),
            ..CliArgs::default()
        };
        let err = build_run_spec(cli).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid repository format 'just-a-name'"));
    }

    #[test]
    fn test_parse_args_full() {
        let spec = parse_args([
            "stale-pr-reaper",
            "--repo",
            "owner/repo",
            "--github-token",
            "ghs_secret",
            "--bot-login",
            "dependabot[bot],mergify[bot]",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(spec.repo, Repo::parse("owner/repo").unwrap());
        assert_eq!(spec.github_token.as_deref(), Some("ghs_secret"));
        assert!(spec.options.dry_run);
        assert!(spec.options.bots.contains(Some("dependabot[bot]")));
        assert!(spec.options.bots.contains(Some("mergify[bot]")));
        assert!(spec.options.bots.contains(Some("renovate[bot]")));
        assert!(!format!("{:?}", spec).contains("ghs_secret"));
    }
}
