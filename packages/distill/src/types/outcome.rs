//! Run outcome classification.

use serde::{Deserialize, Serialize};

/// Terminal classification of one digest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Digest generated and persisted
    Success,

    /// Terminal failure, do not retry
    HardFail,

    /// Assumed-transient failure, safe to retry the same input
    SoftFail,
}

/// Return contract of the run orchestrator.
///
/// Produced once per invocation and never persisted; the status field
/// mirrors the classification in HTTP terms for synchronous callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The classification
    pub outcome: RunOutcome,

    /// HTTP-style status (200 success, 404 not found, 500 failure)
    pub status: u16,

    /// Human-readable summary of what happened
    pub message: String,

    /// Generated markdown on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl RunReport {
    /// A successful run carrying its markdown.
    pub fn success(markdown: String) -> Self {
        Self {
            outcome: RunOutcome::Success,
            status: 200,
            message: "digest generated".to_string(),
            markdown: Some(markdown),
        }
    }

    /// A terminal failure.
    pub fn hard_fail(status: u16, message: impl Into<String>) -> Self {
        Self {
            outcome: RunOutcome::HardFail,
            status,
            message: message.into(),
            markdown: None,
        }
    }

    /// A retryable failure.
    pub fn soft_fail(message: impl Into<String>) -> Self {
        Self {
            outcome: RunOutcome::SoftFail,
            status: 500,
            message: message.into(),
            markdown: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }

    /// Whether the queue boundary should request redelivery.
    pub fn should_retry(&self) -> bool {
        self.outcome == RunOutcome::SoftFail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_soft_failures_retry() {
        assert!(RunReport::soft_fail("transient").should_retry());
        assert!(!RunReport::hard_fail(404, "gone").should_retry());
        assert!(!RunReport::success("# md".into()).should_retry());
    }

    #[test]
    fn success_carries_markdown_and_200() {
        let report = RunReport::success("# md".into());
        assert!(report.is_success());
        assert_eq!(report.status, 200);
        assert_eq!(report.markdown.as_deref(), Some("# md"));
    }
}
