use thiserror::Error;

/// Unified error type for rc-publish operations
#[derive(Error, Debug)]
pub enum RcPublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Head is not ahead of the release base: {0}")]
    NotAhead(String),

    #[error("No common ancestor with the release base: {0}")]
    AmbiguousBase(String),

    #[error("Reference conflict: {0}")]
    Conflict(String),

    #[error("Forge API error: {0}")]
    Forge(String),

    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in rc-publish
pub type Result<T> = std::result::Result<T, RcPublishError>;

impl RcPublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RcPublishError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        RcPublishError::Tag(msg.into())
    }

    /// Create a not-ahead error with context
    pub fn not_ahead(msg: impl Into<String>) -> Self {
        RcPublishError::NotAhead(msg.into())
    }

    /// Create an ambiguous-base error with context
    pub fn ambiguous_base(msg: impl Into<String>) -> Self {
        RcPublishError::AmbiguousBase(msg.into())
    }

    /// Create a reference-conflict error with context
    pub fn conflict(msg: impl Into<String>) -> Self {
        RcPublishError::Conflict(msg.into())
    }

    /// Create a forge API error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        RcPublishError::Forge(msg.into())
    }

    /// Create a notification error with context
    pub fn notify(msg: impl Into<String>) -> Self {
        RcPublishError::Notify(msg.into())
    }
}
