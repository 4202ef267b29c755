use serde_json::json;
use stale_pr_reaper::{CommitInfo, Forge, GitHub, Repo};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, method, path},
};

async fn github_for(server: &MockServer) -> GitHub {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(server.uri())
        .unwrap()
        .personal_token("test-token".to_string())
        .build()
        .unwrap();
    GitHub::new(octocrab)
}

fn test_repo() -> Repo {
    Repo::new("owner", "repo").unwrap()
}

#[tokio::test]
async fn test_search_sends_query_string_and_maps_nodes() {
    let server = MockServer::start().await;
    let query = "type:pr repo:owner/repo author:app/renovate created:<=2021-09-01T12:30:45+00:00 state:open status:failure";

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "queryString": query } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": [{
                "number": 42,
                "title": "Update dependency serde to v1.0.200",
                "url": "https://github.com/owner/repo/pull/42",
                "headRefName": "renovate-serde",
                "author": {"login": "renovate"},
                "commits": {"nodes": [
                    {"commit": {"author": {"user": {"login": "renovate[bot]"}}}},
                    {"commit": {"author": {"user": null}}}
                ]},
                "comments": {"nodes": [{"author": {"login": "github-actions"}}]}
            }]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let prs = github_for(&server)
        .await
        .search_pull_requests(query)
        .await
        .unwrap();

    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].number, 42);
    assert_eq!(prs[0].head_ref_name, "renovate-serde");
    assert_eq!(
        prs[0].commits,
        vec![CommitInfo::by("renovate[bot]"), CommitInfo::default()]
    );
}

#[tokio::test]
async fn test_search_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/graphql"
        })))
        .mount(&server)
        .await;

    let err = github_for(&server)
        .await
        .search_pull_requests("type:pr")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Search failed for query 'type:pr'"));
}

#[tokio::test]
async fn test_search_with_graphql_errors_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": []}},
            "errors": [{"message": "Something went wrong while executing your query."}]
        })))
        .mount(&server)
        .await;

    let err = github_for(&server)
        .await
        .search_pull_requests("type:pr")
        .await
        .unwrap_err();

    let chain = format!("{:#}", err);
    assert!(chain.contains("Search failed for query 'type:pr'"));
    assert!(chain.contains("Something went wrong while executing your query."));
}

#[tokio::test]
async fn test_search_with_undecodable_pull_request_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": [{
                "number": 42,
                "title": "Update dependency serde to v1.0.200",
                "url": "https://github.com/owner/repo/pull/42",
                "headRefName": "renovate-serde",
                "author": {"login": "renovate"},
                "commits": {"nodes": [null]},
                "comments": {"nodes": []}
            }]}}
        })))
        .mount(&server)
        .await;

    let err = github_for(&server)
        .await
        .search_pull_requests("type:pr")
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to decode search result node 0"));
}

#[tokio::test]
async fn test_search_skips_empty_non_pull_request_nodes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"nodes": [{}, {}]}}
        })))
        .mount(&server)
        .await;

    let prs = github_for(&server)
        .await
        .search_pull_requests("type:pr")
        .await
        .unwrap();

    assert!(prs.is_empty());
}

#[tokio::test]
async fn test_close_patches_state_closed() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/owner/repo/pulls/42"))
        .and(body_json(json!({ "state": "closed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "state": "closed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    github_for(&server)
        .await
        .close_pull_request(&test_repo(), 42)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_branch_targets_heads_ref() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/git/refs/heads/renovate-serde"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    github_for(&server)
        .await
        .delete_branch(&test_repo(), "renovate-serde")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_branch_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/owner/repo/git/refs/heads/gone"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Reference does not exist",
            "documentation_url": "https://docs.github.com/rest/git/refs#delete-a-reference"
        })))
        .mount(&server)
        .await;

    let err = github_for(&server)
        .await
        .delete_branch(&test_repo(), "gone")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to delete heads/gone in owner/repo"));
}
