/// A single commit inside a resolved release range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub short_sha: String,
    pub url: String,
    pub message: String,
}

impl CommitRecord {
    /// Build a record from raw forge data, sanitizing the message
    pub fn new(sha: impl Into<String>, url: impl Into<String>, raw_message: &str) -> Self {
        let sha = sha.into();
        let short_sha: String = sha.chars().take(7).collect();
        CommitRecord {
            short_sha,
            sha,
            url: url.into(),
            message: sanitize_message(raw_message),
        }
    }

    /// Render as a single markdown list line with a linked short sha
    pub fn render(&self) -> String {
        format!("- [`{}`]({}) {}", self.short_sha, self.url, self.message)
    }
}

/// Retain only the first line of a commit message.
///
/// Squash merges embed the squashed sub-commit messages after the title,
/// separated by blank lines; everything from the first line break on is
/// dropped. Line-based on purpose: both `\n` and `\r\n` joins are cut, and
/// an already single-line message comes back unchanged.
pub fn sanitize_message(message: &str) -> String {
    let first = message.split('\n').next().unwrap_or("");
    first.strip_suffix('\r').unwrap_or(first).to_string()
}

/// Ordered commit set from a resolved base (exclusive) to head (inclusive)
///
/// Commits keep the order the forge comparison returned them in; the range
/// never re-sorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    base_sha: String,
    commits: Vec<CommitRecord>,
}

impl CommitRange {
    pub fn new(base_sha: impl Into<String>, commits: Vec<CommitRecord>) -> Self {
        CommitRange {
            base_sha: base_sha.into(),
            commits,
        }
    }

    /// Sha of the resolved base point (not part of the range)
    pub fn base_sha(&self) -> &str {
        &self.base_sha
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Render the range as a markdown list, one sanitized line per commit
    pub fn render(&self) -> String {
        self.commits
            .iter()
            .map(CommitRecord::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
