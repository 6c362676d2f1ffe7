//! Library configuration.

use serde::{Deserialize, Serialize};

/// How the extractor serializes the whole-body fallback fragment.
///
/// Rule-matched fragments always carry inner HTML; this only selects the
/// representation when no rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentMode {
    /// Inner HTML of `<body>` — keeps markup through the splitter
    InnerHtml,

    /// Concatenated text of `<body>`
    PlainText,
}

/// Outcome classification when the model returns empty output.
///
/// Observed deployments disagree on whether an empty result is terminal,
/// so the policy is configuration rather than a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutputPolicy {
    /// Treat empty output as a model contract violation: do not retry
    #[default]
    HardFail,

    /// Treat empty output as transient: eligible for retry
    SoftFail,
}

/// Configuration for digest runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistillConfig {
    /// Model for the `rule_driven` variant
    pub primary_model: String,

    /// Model for the `full_text` variant
    pub secondary_model: String,

    /// Default chunk ceiling, in characters
    pub max_chunk_size: usize,

    /// Default output token budget
    pub max_output_tokens: u32,

    /// Classification of empty model output
    pub empty_output: EmptyOutputPolicy,
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self {
            primary_model: "gpt-4o".to_string(),
            secondary_model: "gpt-4o-mini".to_string(),
            max_chunk_size: 8_000,
            max_output_tokens: 2_048,
            empty_output: EmptyOutputPolicy::default(),
        }
    }
}

impl DistillConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary model.
    pub fn with_primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    /// Set the secondary model.
    pub fn with_secondary_model(mut self, model: impl Into<String>) -> Self {
        self.secondary_model = model.into();
        self
    }

    /// Set the default chunk size ceiling.
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Set the default output token budget.
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Set the empty-output policy.
    pub fn with_empty_output(mut self, policy: EmptyOutputPolicy) -> Self {
        self.empty_output = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DistillConfig::default();
        assert!(config.max_chunk_size > 0);
        assert!(config.max_output_tokens > 0);
        assert_eq!(config.empty_output, EmptyOutputPolicy::HardFail);
    }

    #[test]
    fn builders_override_fields() {
        let config = DistillConfig::new()
            .with_primary_model("gpt-4.1")
            .with_max_chunk_size(500)
            .with_empty_output(EmptyOutputPolicy::SoftFail);
        assert_eq!(config.primary_model, "gpt-4.1");
        assert_eq!(config.max_chunk_size, 500);
        assert_eq!(config.empty_output, EmptyOutputPolicy::SoftFail);
    }
}
