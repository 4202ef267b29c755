use std::collections::BTreeSet;

use crate::types::{CommentInfo, CommitInfo};

/// Logins of automation accounts whose comments and commits do not count as
/// human involvement.
pub const DEFAULT_BOT_LOGINS: &[&str] = &["renovate[bot]", "github-actions", "jjenko"];

/// Immutable set of bot account logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotLogins {
    logins: BTreeSet<String>,
}

impl BotLogins {
    pub fn new<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            logins: logins
                .into_iter()
                .map(|login| Into::<String>::into(login).trim().to_string())
                .filter(|login| !login.is_empty())
                .collect(),
        }
    }

    /// The default set extended with `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            DEFAULT_BOT_LOGINS
                .iter()
                .map(|login| login.to_string())
                .chain(extra.into_iter().map(Into::into)),
        )
    }

    /// An absent login is never a bot.
    pub fn contains(&self, login: Option<&str>) -> bool {
        login.is_some_and(|login| self.logins.contains(login))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.logins.iter().map(String::as_str)
    }
}

impl Default for BotLogins {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_LOGINS.iter().copied())
    }
}

/// True if any item's login, as extracted by `login_of`, is outside `bots`.
pub fn has_human<T, F>(items: &[T], bots: &BotLogins, login_of: F) -> bool
where
    F: Fn(&T) -> Option<&str>,
{
    items.iter().any(|item| !bots.contains(login_of(item)))
}

pub fn is_commented_by_human(comments: &[CommentInfo], bots: &BotLogins) -> bool {
    has_human(comments, bots, |comment| comment.author_login.as_deref())
}

/// Commits whose author has no linked account count as human.
pub fn is_committed_by_human(commits: &[CommitInfo], bots: &BotLogins) -> bool {
    has_human(commits, bots, |commit| commit.author_login.as_deref())
}
