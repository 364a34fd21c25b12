//! Release orchestration
//!
//! Linear workflow: resolve tags, resolve the commit range, cut the release
//! branch, open the tracking issue, notify the channel. Each step's output
//! feeds the next, so the steps run sequentially; any failure aborts the
//! run with the originating error and already-created artifacts are left in
//! place (at-most-once, no compensation). Duplicate runs are expected to be
//! prevented by the trigger, not here; two racing runs are stopped only by
//! the ref-creation conflict.

use chrono::NaiveDate;

use crate::domain::candidate::ReleaseCandidate;
use crate::domain::commit::CommitRange;
use crate::domain::tag::ReleaseTag;
use crate::error::{RcPublishError, Result};
use crate::forge::Forge;
use crate::notify::{rc_created_message, Notifier};
use crate::range::resolve_range;
use crate::sequencer::compute_next_tag;

/// Sequences a release-candidate cut against the forge and the chat sink
pub struct ReleaseOrchestrator<'a, F: Forge, N: Notifier> {
    forge: &'a F,
    notifier: &'a N,
    rc_label: String,
}

impl<'a, F: Forge, N: Notifier> ReleaseOrchestrator<'a, F, N> {
    pub fn new(forge: &'a F, notifier: &'a N, rc_label: impl Into<String>) -> Self {
        ReleaseOrchestrator {
            forge,
            notifier,
            rc_label: rc_label.into(),
        }
    }

    /// Cut a release candidate at `head_sha`, stamped for `today`.
    ///
    /// # Returns
    /// * `Ok(ReleaseCandidate)` - Tag, branch ref, and tracking-issue URL
    /// * `Err` - The first failing step's error; no cleanup is attempted
    pub async fn run(&self, head_sha: &str, today: NaiveDate) -> Result<ReleaseCandidate> {
        tracing::info!(%head_sha, "starting release-candidate cut");

        let tags = self.forge.list_tags().await?;
        let sequence = compute_next_tag(&tags, today);
        let latest = sequence.latest.ok_or_else(|| {
            RcPublishError::tag(
                "no previous release tag found; push an initial v<YYYYMMDD>.1 tag \
                 and its release/ branch once to bootstrap",
            )
        })?;
        let next = sequence.next;
        tracing::info!(latest = %latest, next = %next, "tags resolved");

        let range = resolve_range(self.forge, &latest, head_sha).await?;
        tracing::info!(commits = range.len(), base = range.base_sha(), "commit range resolved");

        self.forge.create_ref(&next.branch_ref(), head_sha).await?;
        tracing::info!(branch = %next.branch_name(), "release branch created");

        let title = format!("Release candidate {}", next);
        let body = render_issue_body(&latest, &next, &range);
        let issue = self
            .forge
            .create_issue(&title, &[&self.rc_label], &body)
            .await?;
        tracing::info!(url = %issue.url, "tracking issue created");

        self.notifier
            .post(&rc_created_message(next.name(), &issue.url))
            .await?;
        tracing::info!("notification sent");

        Ok(ReleaseCandidate {
            branch_ref: next.branch_ref(),
            issue_url: issue.url,
            created_at: issue.created_at,
            tag: next,
        })
    }
}

/// Render the fixed tracking-issue body.
///
/// Pure interpolation of the tag names, branch name, and rendered commit
/// range into the operator template; no conditional logic.
pub fn render_issue_body(latest: &ReleaseTag, next: &ReleaseTag, range: &CommitRange) -> String {
    format!(
        "**Script generated description. DO NOT MODIFY**\n\n\
         ## Metadata\n\
         - Release tag: {next}\n\
         - Branch: {branch}\n\n\
         ## Actions\n\
         - To add release fixes:\n\
           1. `git checkout {branch}`\n\
           2. Check in fixes to the release branch.\n\
           3. (If applied) Cherry-pick the fix to the default branch.\n\
         - To approve the push: add the `QA Approved` label and close the issue.\n\
         - To cancel the push: close the issue directly.\n\n\
         ## Included commits (compared to {latest})\n\
         {commits}\n",
        next = next,
        branch = next.branch_name(),
        latest = latest,
        commits = range.render(),
    )
}
