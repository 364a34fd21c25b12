use chrono::{DateTime, Utc};

use crate::domain::tag::ReleaseTag;

/// Outcome of a successful release-candidate cut
///
/// Created once per orchestrator run and never mutated afterwards. The
/// candidate's lifecycle ends when its tracking issue is closed, which is
/// observed on the forge rather than owned here.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCandidate {
    pub tag: ReleaseTag,
    pub branch_ref: String,
    pub issue_url: String,
    pub created_at: DateTime<Utc>,
}
