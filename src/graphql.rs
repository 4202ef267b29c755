use anyhow::{Context, Result};

use crate::types::*;

// One page only: the newest 100 matches, each with its last 100 commits
// and comments.
pub fn create_graphql_query(search_query: &str) -> serde_json::Value {
    serde_json::json!({
        "query": r#"
            query SearchStaleFailingRenovatePR($queryString: String!) {
                search(query: $queryString, type: ISSUE, last: 100) {
                    nodes {
                        ... on PullRequest {
                            number
                            title
                            url
                            headRefName
                            author {
                                login
                            }
                            commits(last: 100) {
                                nodes {
                                    commit {
                                        author {
                                            user {
                                                login
                                            }
                                        }
                                    }
                                }
                            }
                            comments(last: 100) {
                                nodes {
                                    author {
                                        login
                                    }
                                }
                            }
                        }
                    }
                }
            }
        "#,
        "variables": {
            "queryString": search_query,
        }
    })
}

pub fn convert_commits(commits: GraphQLCommitConnection) -> Vec<CommitInfo> {
    commits
        .nodes
        .into_iter()
        .map(|node| CommitInfo {
            author_login: node
                .commit
                .author
                .and_then(|author| author.user)
                .map(|user| user.login),
        })
        .collect()
}

pub fn convert_comments(comments: GraphQLCommentConnection) -> Vec<CommentInfo> {
    comments
        .nodes
        .into_iter()
        .map(|comment| CommentInfo {
            author_login: comment.author.map(|author| author.login),
        })
        .collect()
}

pub fn convert_graphql_pr(graphql_pr: GraphQLPullRequest) -> PullRequest {
    PullRequest {
        number: graphql_pr.number,
        title: graphql_pr.title,
        url: graphql_pr.url,
        head_ref_name: graphql_pr.head_ref_name,
        author_login: graphql_pr.author.map(|author| author.login),
        commits: convert_commits(graphql_pr.commits),
        comments: convert_comments(graphql_pr.comments),
    }
}

/// Keeps the pull request nodes of a search response, in response order.
///
/// Top-level GraphQL errors, a missing `data` field and pull request nodes
/// that do not decode are all errors; only empty (non-pull-request) nodes are
/// skipped.
pub fn convert_search_response(response: GraphQLResponse) -> Result<Vec<PullRequest>> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect();
        anyhow::bail!("GraphQL search returned errors: {}", messages.join("; "));
    }

    let data = response
        .data
        .context("GraphQL search response carried no data")?;

    let mut prs = Vec::with_capacity(data.search.nodes.len());
    for (index, node) in data.search.nodes.into_iter().enumerate() {
        if node.as_object().is_some_and(|fields| fields.is_empty()) {
            continue;
        }
        let graphql_pr: GraphQLPullRequest = serde_json::from_value(node)
            .with_context(|| format!("Failed to decode search result node {}", index))?;
        prs.push(convert_graphql_pr(graphql_pr));
    }

    Ok(prs)
}
