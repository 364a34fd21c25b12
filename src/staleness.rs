//! RC staleness detection
//!
//! Independent, periodically triggered path that reads the open RC issue
//! and nags the channel when the issue has been open past the threshold.
//! Read-only with respect to the forge; the issue is never mutated.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::forge::Forge;
use crate::notify::{stale_reminder_message, Notifier};

/// Days an RC issue may stay open before the reminder fires
pub const DEFAULT_STALE_THRESHOLD_DAYS: i64 = 2;

/// Whether an issue created at `created_at` is stale at `now`.
///
/// Strict inequality: an issue exactly `threshold_days` old is not yet
/// stale.
pub fn is_stale(created_at: DateTime<Utc>, now: DateTime<Utc>, threshold_days: i64) -> bool {
    now.signed_duration_since(created_at) > Duration::days(threshold_days)
}

/// Outcome of a staleness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StalenessOutcome {
    /// No open RC issue exists; nothing to do
    NoOpenIssue,
    /// The RC issue is younger than the threshold
    Fresh { issue_url: String },
    /// One reminder was posted for the stale issue
    ReminderSent { issue_url: String },
}

/// Check the open RC issue and post one reminder if it has gone stale.
///
/// Steady state is a single open RC issue. When several are open at once
/// the most recently created one is checked, deterministically, and a
/// warning is logged rather than guessing silently or failing the run.
pub async fn check_staleness<F, N>(
    forge: &F,
    notifier: &N,
    rc_label: &str,
    threshold_days: i64,
    now: DateTime<Utc>,
) -> Result<StalenessOutcome>
where
    F: Forge + ?Sized,
    N: Notifier + ?Sized,
{
    let issues = forge.list_issues(&[rc_label]).await?;

    if issues.len() > 1 {
        tracing::warn!(
            count = issues.len(),
            "multiple open RC issues; checking the most recent"
        );
    }

    let issue = match issues.into_iter().max_by_key(|issue| issue.created_at) {
        Some(issue) => issue,
        None => return Ok(StalenessOutcome::NoOpenIssue),
    };

    if !is_stale(issue.created_at, now, threshold_days) {
        return Ok(StalenessOutcome::Fresh {
            issue_url: issue.url,
        });
    }

    notifier
        .post(&stale_reminder_message(issue.created_at, &issue.url))
        .await?;

    Ok(StalenessOutcome::ReminderSent {
        issue_url: issue.url,
    })
}
