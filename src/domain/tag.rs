use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;

/// Prefix shared by all release tags
pub const RELEASE_PREFIX: &str = "v";

/// A date-sequenced release tag
///
/// Tag names follow `v<YYYYMMDD>.<N>`: the date is the release day and `N`
/// counts same-day releases starting at 1. Tags order first by date, then by
/// sequence number, so the ordering is total across the whole tag history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    name: String,
    date: String,
    seq: u32,
}

impl ReleaseTag {
    /// Parse a tag name against the release grammar.
    ///
    /// Returns `None` for anything that is not exactly `v<YYYYMMDD>.<N>`
    /// with a positive sequence number. Callers listing forge tags use this
    /// to skip unrelated tags (e.g. library version tags).
    pub fn parse(name: &str) -> Option<Self> {
        let re = Regex::new(r"^v(\d{8})\.([1-9]\d*)$").ok()?;
        let captures = re.captures(name)?;

        let date = captures.get(1)?.as_str().to_string();
        let seq = captures.get(2)?.as_str().parse::<u32>().ok()?;

        Some(ReleaseTag {
            name: name.to_string(),
            date,
            seq,
        })
    }

    /// Build the tag for a given release day and sequence number
    pub fn for_day(day: NaiveDate, seq: u32) -> Self {
        let date = day.format("%Y%m%d").to_string();
        let name = format!("{}{}.{}", RELEASE_PREFIX, date, seq);
        ReleaseTag { name, date, seq }
    }

    /// Full tag name (e.g. "v20240602.1")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Eight-digit date component (e.g. "20240602")
    pub fn date_stamp(&self) -> &str {
        &self.date
    }

    /// Same-day sequence number, starting at 1
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Short name of the release branch cut for this tag
    pub fn branch_name(&self) -> String {
        format!("release/{}", self.name)
    }

    /// Fully qualified git ref of the release branch
    pub fn branch_ref(&self) -> String {
        format!("refs/heads/release/{}", self.name)
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Ord for ReleaseTag {
    fn cmp(&self, other: &Self) -> Ordering {
        // Fixed-width digit strings, so lexicographic equals numeric
        self.date
            .cmp(&other.date)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ReleaseTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
