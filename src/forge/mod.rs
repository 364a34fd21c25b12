//! Forge collaborator boundary
//!
//! This module provides a trait-based abstraction over the code-forge's
//! repository API, allowing for multiple implementations including the real
//! GitHub REST client and a mock implementation for testing.
//!
//! Most code should depend on the [Forge] trait rather than concrete
//! implementations. Response shapes are explicit records validated on
//! ingress; nothing downstream touches raw JSON.

pub mod github;
pub mod mock;

pub use github::GithubForge;
pub use mock::MockForge;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;

/// Comparison status between a base and a head commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareStatus {
    Ahead,
    Behind,
    Diverged,
    Identical,
}

/// A commit as returned by the forge comparison API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeCommit {
    pub sha: String,
    pub html_url: String,
    /// Raw commit message; sanitization happens in the range resolver
    pub message: String,
}

/// Result of comparing a base ref against a head commit
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    pub status: CompareStatus,
    /// Nearest common ancestor of base and head, when one exists
    pub merge_base_sha: Option<String>,
    /// True size of the range as reported by the forge; can exceed
    /// `commits.len()` when the comparison hit the client's fetch cap
    pub total_commits: u64,
    pub commits: Vec<ForgeCommit>,
}

/// An issue as returned by the forge issues API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Common forge operation trait for abstraction
///
/// All implementors must be `Send + Sync`. Every method returns
/// [crate::error::Result]; implementations map transport and API failures to
/// the appropriate [crate::error::RcPublishError] variants.
///
/// ## Implementations
///
/// - [GithubForge](github::GithubForge): GitHub REST implementation over reqwest
/// - [MockForge](mock::MockForge): in-memory implementation for tests
#[async_trait]
pub trait Forge: Send + Sync {
    /// List every tag name in the repository.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - All tag names, in the order the forge returns them
    /// * `Err` - `Config` when the repository or credentials are rejected
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// Compare `base` (ref name or sha) against `head`.
    ///
    /// # Returns
    /// * `Ok(CompareResult)` - Status, merge base, and the commits from the
    ///   merge base (exclusive) to head (inclusive), in forge order
    /// * `Err` - `AmbiguousBase` when the refs share no history
    async fn compare_commits(&self, base: &str, head: &str) -> Result<CompareResult>;

    /// Create a git ref (e.g. "refs/heads/release/v20240602.1") at `sha`.
    ///
    /// # Returns
    /// * `Ok(())` - Ref created
    /// * `Err` - `Conflict` when the ref already exists
    async fn create_ref(&self, full_ref: &str, sha: &str) -> Result<()>;

    /// Open an issue with the given title, labels, and body
    async fn create_issue(&self, title: &str, labels: &[&str], body: &str) -> Result<Issue>;

    /// List open issues carrying all of the given labels
    async fn list_issues(&self, labels: &[&str]) -> Result<Vec<Issue>>;
}
