//! Typed errors for the distill library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the orchestrator
//! can classify outcomes from error variants instead of error shape.

use thiserror::Error;

/// Errors raised anywhere in the digest pipeline.
///
/// Lower components raise; only the run orchestrator decides retryability
/// (see [`crate::pipeline::run`]).
#[derive(Debug, Error)]
pub enum DistillError {
    /// URL has no metadata record — the page was never ingested
    #[error("page not found: {url}")]
    PageNotFound { url: String },

    /// Metadata exists but the raw object is gone
    #[error("raw content missing: {key}")]
    ContentMissing { key: String },

    /// Raw content is not valid UTF-8
    #[error("content decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Every rule failed or was skipped and nothing was extracted
    #[error("no usable content extracted")]
    NoUsableContent,

    /// The generation service returned empty or whitespace-only text
    #[error("model returned empty output")]
    EmptyOutput,

    /// Generation service call failed
    #[error("generation service error: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Metadata or content store operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Rule store operation failed
    #[error("rule store error: {0}")]
    RuleStore(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Queue operation failed
    #[error("queue error: {0}")]
    Queue(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Job URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for distill operations.
pub type Result<T> = std::result::Result<T, DistillError>;
