//! Release-tag sequencing
//!
//! Derives the latest existing release tag and the next `v<YYYYMMDD>.<N>`
//! tag from the full tag list and the current release day. Pure over its
//! inputs; fetching the tag list is the collaborator's job.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::domain::tag::ReleaseTag;

/// Release days are stamped against a fixed UTC-8 offset so a single
/// release day maps to a single tag date no matter where a run executes.
const RELEASE_UTC_OFFSET_SECS: i32 = -8 * 3600;

/// Latest and next release tag derived from the tag history
#[derive(Debug, Clone, PartialEq)]
pub struct TagSequence {
    /// Greatest existing release tag, `None` before the first-ever release
    pub latest: Option<ReleaseTag>,
    /// Tag the current run will cut
    pub next: ReleaseTag,
}

/// Today's date in the release timezone
pub fn release_day_today() -> NaiveDate {
    release_day(Utc::now())
}

/// Project an instant onto the release calendar
pub fn release_day(now: DateTime<Utc>) -> NaiveDate {
    let offset = FixedOffset::east_opt(RELEASE_UTC_OFFSET_SECS).expect("static UTC-8 offset");
    now.with_timezone(&offset).date_naive()
}

/// Compute the next release tag for `today` given every existing tag name.
///
/// Tag names that do not match the release grammar are skipped. The next
/// tag always stamps `today`; if tags for today already exist, the sequence
/// number continues from the maximum found (not the count), so gaps left by
/// deleted tags never cause a collision.
pub fn compute_next_tag(tag_names: &[String], today: NaiveDate) -> TagSequence {
    let parsed: Vec<ReleaseTag> = tag_names
        .iter()
        .filter_map(|name| ReleaseTag::parse(name))
        .collect();

    let latest = parsed.iter().max().cloned();

    let today_stamp = today.format("%Y%m%d").to_string();
    let max_today = parsed
        .iter()
        .filter(|tag| tag.date_stamp() == today_stamp)
        .map(ReleaseTag::seq)
        .max();

    let next = ReleaseTag::for_day(today, max_today.map_or(1, |n| n + 1));

    TagSequence { latest, next }
}
