//! Commit-range resolution
//!
//! Finds the correct diff base between the previous release and the current
//! head and returns the ordered, sanitized commit list between them. The
//! previous release branch may carry cherry-picked hotfixes that are not
//! ancestors of head; diffing against the raw tag would report those as new
//! or flip the ahead/behind status, so the base is the merge base instead.

use crate::domain::commit::{CommitRange, CommitRecord};
use crate::domain::tag::ReleaseTag;
use crate::error::{RcPublishError, Result};
use crate::forge::{CompareStatus, Forge};

/// Resolve the commit range from the previous release to `head_sha`.
///
/// Two phases: a probe against `release/<latest>` establishes the merge
/// base, then the range is taken from that merge base (exclusive) to head
/// (inclusive). The final comparison must be `ahead`; a release is never
/// cut from a non-advancing head.
pub async fn resolve_range<F>(forge: &F, latest: &ReleaseTag, head_sha: &str) -> Result<CommitRange>
where
    F: Forge + ?Sized,
{
    let base_branch = latest.branch_name();
    let probe = forge.compare_commits(&base_branch, head_sha).await?;

    let merge_base = probe
        .merge_base_sha
        .clone()
        .ok_or_else(|| RcPublishError::ambiguous_base(format!("{} vs {}", base_branch, head_sha)))?;

    let comparison = match probe.status {
        // No divergence: the merge base is the release branch tip and the
        // probe range is already the final range.
        CompareStatus::Ahead => probe,
        // A head at or behind the previous release cannot be ahead of the
        // merge base either; fail without another comparison.
        CompareStatus::Behind | CompareStatus::Identical => {
            return Err(RcPublishError::not_ahead(format!(
                "{} is {:?} relative to {}",
                head_sha, probe.status, base_branch
            )));
        }
        // Divergence is the cherry-picked-hotfix case: rescope the range
        // from the merge base.
        CompareStatus::Diverged => forge.compare_commits(&merge_base, head_sha).await?,
    };

    if comparison.status != CompareStatus::Ahead {
        return Err(RcPublishError::not_ahead(format!(
            "{} is {:?} relative to merge base {}",
            head_sha, comparison.status, merge_base
        )));
    }

    if (comparison.commits.len() as u64) < comparison.total_commits {
        return Err(RcPublishError::forge(format!(
            "comparison returned {} of {} commits; refusing to render a truncated range",
            comparison.commits.len(),
            comparison.total_commits
        )));
    }

    if comparison.commits.is_empty() {
        return Err(RcPublishError::not_ahead(format!(
            "no commits between {} and {}",
            merge_base, head_sha
        )));
    }

    let commits = comparison
        .commits
        .into_iter()
        .map(|c| CommitRecord::new(c.sha, c.html_url, &c.message))
        .collect();

    Ok(CommitRange::new(merge_base, commits))
}
