use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{RcPublishError, Result};
use crate::forge::{CompareResult, Forge, Issue};

/// An issue captured by [MockForge::create_issue]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub title: String,
    pub labels: Vec<String>,
    pub body: String,
}

/// Mock forge for testing without network access
///
/// Fixtures are installed up front with the setter methods; every call is
/// recorded so tests can assert outcomes as well as call order.
pub struct MockForge {
    tags: Vec<String>,
    compares: HashMap<(String, String), CompareResult>,
    open_issues: Vec<Issue>,
    issue_url: String,
    issue_created_at: DateTime<Utc>,
    fail_ref_with_conflict: bool,
    pub calls: Mutex<Vec<String>>,
    pub created_refs: Mutex<Vec<(String, String)>>,
    pub created_issues: Mutex<Vec<CreatedIssue>>,
}

impl MockForge {
    /// Create a new empty mock forge
    pub fn new() -> Self {
        MockForge {
            tags: Vec::new(),
            compares: HashMap::new(),
            open_issues: Vec::new(),
            issue_url: "https://example.com/issues/1".to_string(),
            issue_created_at: Utc::now(),
            fail_ref_with_conflict: false,
            calls: Mutex::new(Vec::new()),
            created_refs: Mutex::new(Vec::new()),
            created_issues: Mutex::new(Vec::new()),
        }
    }

    /// Add a tag name to the tag listing
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }

    /// Install the comparison fixture for a (base, head) pair
    pub fn set_compare(
        &mut self,
        base: impl Into<String>,
        head: impl Into<String>,
        result: CompareResult,
    ) {
        self.compares.insert((base.into(), head.into()), result);
    }

    /// Add an already-open issue to the issue listing
    pub fn add_open_issue(&mut self, issue: Issue) {
        self.open_issues.push(issue);
    }

    /// Set the URL and creation time returned for created issues
    pub fn set_issue_result(&mut self, url: impl Into<String>, created_at: DateTime<Utc>) {
        self.issue_url = url.into();
        self.issue_created_at = created_at;
    }

    /// Make every `create_ref` call fail with a conflict
    pub fn fail_ref_with_conflict(&mut self) {
        self.fail_ref_with_conflict = true;
    }

    /// Names of the forge calls issued so far, in order
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, call: &str) {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(call.to_string());
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    async fn list_tags(&self) -> Result<Vec<String>> {
        self.record("list_tags");
        Ok(self.tags.clone())
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<CompareResult> {
        self.record("compare_commits");
        self.compares
            .get(&(base.to_string(), head.to_string()))
            .cloned()
            .ok_or_else(|| {
                RcPublishError::forge(format!("no compare fixture for {}...{}", base, head))
            })
    }

    async fn create_ref(&self, full_ref: &str, sha: &str) -> Result<()> {
        self.record("create_ref");
        if self.fail_ref_with_conflict {
            return Err(RcPublishError::conflict(format!(
                "{}: reference already exists",
                full_ref
            )));
        }
        self.created_refs
            .lock()
            .expect("mock ref log poisoned")
            .push((full_ref.to_string(), sha.to_string()));
        Ok(())
    }

    async fn create_issue(&self, title: &str, labels: &[&str], body: &str) -> Result<Issue> {
        self.record("create_issue");
        self.created_issues
            .lock()
            .expect("mock issue log poisoned")
            .push(CreatedIssue {
                title: title.to_string(),
                labels: labels.iter().map(|l| l.to_string()).collect(),
                body: body.to_string(),
            });
        Ok(Issue {
            url: self.issue_url.clone(),
            title: title.to_string(),
            created_at: self.issue_created_at,
        })
    }

    async fn list_issues(&self, _labels: &[&str]) -> Result<Vec<Issue>> {
        self.record("list_issues");
        Ok(self.open_issues.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::CompareStatus;

    #[tokio::test]
    async fn test_mock_forge_tags() {
        let mut forge = MockForge::new();
        forge.add_tag("v20240601.1");
        forge.add_tag("v20240601.2");

        let tags = forge.list_tags().await.unwrap();
        assert_eq!(tags, vec!["v20240601.1", "v20240601.2"]);
    }

    #[tokio::test]
    async fn test_mock_forge_compare_fixture() {
        let mut forge = MockForge::new();
        forge.set_compare(
            "release/v20240601.1",
            "abc",
            CompareResult {
                status: CompareStatus::Ahead,
                merge_base_sha: Some("base".to_string()),
                total_commits: 0,
                commits: vec![],
            },
        );

        let result = forge.compare_commits("release/v20240601.1", "abc").await.unwrap();
        assert_eq!(result.status, CompareStatus::Ahead);

        let missing = forge.compare_commits("release/v20240601.1", "other").await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_mock_forge_records_calls_in_order() {
        let forge = MockForge::new();
        let _ = forge.list_tags().await;
        let _ = forge.create_ref("refs/heads/release/v20240601.1", "abc").await;

        assert_eq!(forge.call_log(), vec!["list_tags", "create_ref"]);
    }

    #[tokio::test]
    async fn test_mock_forge_ref_conflict() {
        let mut forge = MockForge::new();
        forge.fail_ref_with_conflict();

        let err = forge
            .create_ref("refs/heads/release/v20240601.1", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, RcPublishError::Conflict(_)));
    }
}
