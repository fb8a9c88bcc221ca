use thiserror::Error;

/// Core error taxonomy. Per-account failures (`MalformedRecord`,
/// `UpstreamFetch`) are isolated by the batch report; the remaining
/// variants are fatal to a single request only.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed transaction record: {0}")]
    MalformedRecord(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template unreadable: {0}")]
    TemplateUnreadable(String),

    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
