//! GitHub REST implementation of the forge boundary

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::error::{RcPublishError, Result};
use crate::forge::{CompareResult, CompareStatus, Forge, ForgeCommit, Issue};

/// Page size for tag listing and commit comparison
const PER_PAGE: u32 = 100;

/// Hard cap on commits fetched for a single comparison. The range resolver
/// fails loudly when the true range exceeds this instead of truncating.
pub const MAX_COMPARE_COMMITS: usize = 1000;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("rc-publish/", env!("CARGO_PKG_VERSION"));

/// Forge client for the GitHub REST API
pub struct GithubForge {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
    /// Elevated-privilege token used for ref creation when present
    push_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetailDto {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommitDto {
    sha: String,
    html_url: String,
    commit: CommitDetailDto,
}

#[derive(Debug, Deserialize)]
struct CommitRefDto {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CompareDto {
    status: CompareStatus,
    total_commits: u64,
    merge_base_commit: Option<CommitRefDto>,
    commits: Vec<CommitDto>,
}

#[derive(Debug, Deserialize)]
struct IssueDto {
    html_url: String,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<IssueDto> for Issue {
    fn from(dto: IssueDto) -> Self {
        Issue {
            url: dto.html_url,
            title: dto.title,
            created_at: dto.created_at,
        }
    }
}

impl GithubForge {
    pub fn new(
        api_base: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        push_token: Option<String>,
    ) -> Self {
        GithubForge {
            client: Client::new(),
            api_base: api_base.into(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            push_token,
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            path
        )
    }

    fn with_headers(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(token)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.with_headers(self.client.get(url), &self.token)
    }

    /// Turn a non-success response into the matching error variant
    async fn api_error(response: Response, context: &str) -> RcPublishError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = format!("{} ({}): {}", context, status, body.trim());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            RcPublishError::config(message)
        } else {
            RcPublishError::forge(message)
        }
    }
}

#[async_trait]
impl Forge for GithubForge {
    async fn list_tags(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for page in 1.. {
            let url = self.repo_url(&format!("/tags?per_page={}&page={}", PER_PAGE, page));
            tracing::debug!(%url, "listing tags");

            let response = self.get(&url).send().await?;
            if !response.status().is_success() {
                // A rejected tag listing is almost always a bad token or a
                // wrong repository coordinate, so not-found counts as
                // configuration here.
                let not_found = response.status() == StatusCode::NOT_FOUND;
                let err = Self::api_error(response, "listing tags").await;
                return Err(match err {
                    RcPublishError::Forge(msg) if not_found => RcPublishError::Config(msg),
                    other => other,
                });
            }

            let tags: Vec<TagDto> = response.json().await?;
            let page_len = tags.len();
            names.extend(tags.into_iter().map(|t| t.name));

            if page_len < PER_PAGE as usize {
                break;
            }
        }

        Ok(names)
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<CompareResult> {
        let mut status = None;
        let mut merge_base_sha = None;
        let mut total_commits = 0;
        let mut commits: Vec<ForgeCommit> = Vec::new();

        for page in 1.. {
            let url = self.repo_url(&format!(
                "/compare/{}...{}?per_page={}&page={}",
                base, head, PER_PAGE, page
            ));
            tracing::debug!(%url, "comparing commits");

            let response = self.get(&url).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                let body = response.text().await.unwrap_or_default();
                return Err(RcPublishError::ambiguous_base(format!(
                    "{}...{}: {}",
                    base,
                    head,
                    body.trim()
                )));
            }
            if !response.status().is_success() {
                return Err(Self::api_error(response, "comparing commits").await);
            }

            let dto: CompareDto = response.json().await?;
            if status.is_none() {
                status = Some(dto.status);
                merge_base_sha = dto.merge_base_commit.map(|c| c.sha);
                total_commits = dto.total_commits;
            }

            let page_len = dto.commits.len();
            commits.extend(dto.commits.into_iter().map(|c| ForgeCommit {
                sha: c.sha,
                html_url: c.html_url,
                message: c.commit.message,
            }));

            let complete = commits.len() as u64 >= total_commits;
            if complete || page_len == 0 || commits.len() >= MAX_COMPARE_COMMITS {
                break;
            }
        }

        Ok(CompareResult {
            // The loop above runs at least once, so status is always set
            status: status.unwrap_or(CompareStatus::Identical),
            merge_base_sha,
            total_commits,
            commits,
        })
    }

    async fn create_ref(&self, full_ref: &str, sha: &str) -> Result<()> {
        let url = self.repo_url("/git/refs");
        let token = self.push_token.as_deref().unwrap_or(&self.token);
        let body = serde_json::json!({ "ref": full_ref, "sha": sha });

        tracing::debug!(%full_ref, %sha, "creating ref");
        let response = self
            .with_headers(self.client.post(&url), token)
            .json(&body)
            .send()
            .await?;

        // 422 is GitHub's "reference already exists"; this is the sole
        // guard against two racing runs computing the same tag.
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY
            || response.status() == StatusCode::CONFLICT
        {
            let detail = response.text().await.unwrap_or_default();
            return Err(RcPublishError::conflict(format!(
                "{}: {}",
                full_ref,
                detail.trim()
            )));
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response, "creating ref").await);
        }

        Ok(())
    }

    async fn create_issue(&self, title: &str, labels: &[&str], body: &str) -> Result<Issue> {
        let url = self.repo_url("/issues");
        let payload = serde_json::json!({
            "title": title,
            "labels": labels,
            "body": body,
        });

        tracing::debug!(%title, "creating issue");
        let response = self
            .with_headers(self.client.post(&url), &self.token)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response, "creating issue").await);
        }

        let dto: IssueDto = response.json().await?;
        Ok(dto.into())
    }

    async fn list_issues(&self, labels: &[&str]) -> Result<Vec<Issue>> {
        let url = self.repo_url(&format!(
            "/issues?state=open&labels={}&per_page={}",
            labels.join(","),
            PER_PAGE
        ));

        tracing::debug!(%url, "listing issues");
        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response, "listing issues").await);
        }

        let dtos: Vec<IssueDto> = response.json().await?;
        Ok(dtos.into_iter().map(Issue::from).collect())
    }
}
