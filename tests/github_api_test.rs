// tests/github_api_test.rs
//
// GithubForge against a local mock server: pagination, auth headers,
// conflict mapping, and boundary-shape validation.

use httpmock::prelude::*;
use serde_json::{json, Value};

use rc_publish::error::RcPublishError;
use rc_publish::forge::{CompareStatus, Forge, GithubForge};

fn forge_for(server: &MockServer) -> GithubForge {
    GithubForge::new(server.base_url(), "acme", "widgets", "token123", None)
}

fn tag_page(start: u32, count: u32) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| json!({ "name": format!("v20240501.{}", i) }))
            .collect(),
    )
}

fn commit_page(start: u32, count: u32) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| {
                json!({
                    "sha": format!("{:07}aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", i),
                    "html_url": format!("https://example.com/c/{}", i),
                    "commit": { "message": format!("change {}", i) }
                })
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_list_tags_single_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/tags")
            .query_param("page", "1")
            .header("authorization", "Bearer token123")
            .header("accept", "application/vnd.github+json");
        then.status(200)
            .json_body(json!([{ "name": "v20240601.1" }, { "name": "v20240601.2" }]));
    });

    let tags = forge_for(&server).list_tags().await.unwrap();
    assert_eq!(tags, vec!["v20240601.1", "v20240601.2"]);
    mock.assert();
}

#[tokio::test]
async fn test_list_tags_follows_pages() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/tags")
            .query_param("page", "1");
        then.status(200).json_body(tag_page(1, 100));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/tags")
            .query_param("page", "2");
        then.status(200).json_body(tag_page(101, 1));
    });

    let tags = forge_for(&server).list_tags().await.unwrap();
    assert_eq!(tags.len(), 101);
    first.assert();
    second.assert();
}

#[tokio::test]
async fn test_list_tags_unknown_repo_is_configuration() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/widgets/tags");
        then.status(404).json_body(json!({ "message": "Not Found" }));
    });

    let err = forge_for(&server).list_tags().await.unwrap_err();
    assert!(matches!(err, RcPublishError::Config(_)));
}

#[tokio::test]
async fn test_compare_commits_parses_result() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/compare/release/v20240601.1...head0000");
        then.status(200).json_body(json!({
            "status": "ahead",
            "total_commits": 1,
            "merge_base_commit": { "sha": "base0000" },
            "commits": [{
                "sha": "aaa1111bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                "html_url": "https://example.com/c/aaa1111",
                "commit": { "message": "feat: one\n\ndetails" }
            }]
        }));
    });

    let result = forge_for(&server)
        .compare_commits("release/v20240601.1", "head0000")
        .await
        .unwrap();

    assert_eq!(result.status, CompareStatus::Ahead);
    assert_eq!(result.merge_base_sha.as_deref(), Some("base0000"));
    assert_eq!(result.total_commits, 1);
    assert_eq!(result.commits.len(), 1);
    // Raw message is preserved at the boundary; sanitization is the
    // resolver's job.
    assert_eq!(result.commits[0].message, "feat: one\n\ndetails");
}

#[tokio::test]
async fn test_compare_commits_follows_pages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/compare/base0000...head0000")
            .query_param("page", "1");
        then.status(200).json_body(json!({
            "status": "ahead",
            "total_commits": 150,
            "merge_base_commit": { "sha": "base0000" },
            "commits": commit_page(1, 100)
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/compare/base0000...head0000")
            .query_param("page", "2");
        then.status(200).json_body(json!({
            "status": "ahead",
            "total_commits": 150,
            "merge_base_commit": { "sha": "base0000" },
            "commits": commit_page(101, 50)
        }));
    });

    let result = forge_for(&server)
        .compare_commits("base0000", "head0000")
        .await
        .unwrap();

    assert_eq!(result.commits.len(), 150);
    assert_eq!(result.total_commits, 150);
}

#[tokio::test]
async fn test_compare_commits_without_common_history() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/compare/release/v20240601.1...head0000");
        then.status(404)
            .json_body(json!({ "message": "No common ancestor" }));
    });

    let err = forge_for(&server)
        .compare_commits("release/v20240601.1", "head0000")
        .await
        .unwrap_err();
    assert!(matches!(err, RcPublishError::AmbiguousBase(_)));
}

#[tokio::test]
async fn test_create_ref_posts_ref_and_sha() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/acme/widgets/git/refs")
            .header("authorization", "Bearer token123")
            .json_body(json!({
                "ref": "refs/heads/release/v20240602.1",
                "sha": "head0000"
            }));
        then.status(201).json_body(json!({
            "ref": "refs/heads/release/v20240602.1",
            "object": { "sha": "head0000" }
        }));
    });

    forge_for(&server)
        .create_ref("refs/heads/release/v20240602.1", "head0000")
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_create_ref_uses_workflow_token_when_present() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/acme/widgets/git/refs")
            .header("authorization", "Bearer wf-token");
        then.status(201).json_body(json!({}));
    });

    let forge = GithubForge::new(
        server.base_url(),
        "acme",
        "widgets",
        "token123",
        Some("wf-token".to_string()),
    );
    forge
        .create_ref("refs/heads/release/v20240602.1", "head0000")
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_create_ref_conflict_on_existing_branch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/repos/acme/widgets/git/refs");
        then.status(422)
            .json_body(json!({ "message": "Reference already exists" }));
    });

    let err = forge_for(&server)
        .create_ref("refs/heads/release/v20240602.1", "head0000")
        .await
        .unwrap_err();
    assert!(matches!(err, RcPublishError::Conflict(_)));
}

#[tokio::test]
async fn test_create_issue_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/acme/widgets/issues")
            .json_body(json!({
                "title": "Release candidate v20240602.1",
                "labels": ["RC"],
                "body": "body text"
            }));
        then.status(201).json_body(json!({
            "html_url": "https://example.com/issues/42",
            "title": "Release candidate v20240602.1",
            "created_at": "2024-06-02T12:00:00Z"
        }));
    });

    let issue = forge_for(&server)
        .create_issue("Release candidate v20240602.1", &["RC"], "body text")
        .await
        .unwrap();

    assert_eq!(issue.url, "https://example.com/issues/42");
    assert_eq!(issue.created_at.to_rfc3339(), "2024-06-02T12:00:00+00:00");
    mock.assert();
}

#[tokio::test]
async fn test_list_issues_filters_open_by_label() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/issues")
            .query_param("state", "open")
            .query_param("labels", "RC");
        then.status(200).json_body(json!([{
            "html_url": "https://example.com/issues/9",
            "title": "Release candidate v20240601.1",
            "created_at": "2024-05-27T17:07:37Z"
        }]));
    });

    let issues = forge_for(&server).list_issues(&["RC"]).await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].url, "https://example.com/issues/9");
    mock.assert();
}
