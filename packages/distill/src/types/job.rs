//! Units of work at the request surface and the queue boundary.

use serde::{Deserialize, Serialize};

/// Which model pipeline handles a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Per-domain rules, HTML chunks, primary model
    #[default]
    RuleDriven,

    /// Whole-body plain text, no rule lookup, secondary model
    FullText,
}

/// One digest job.
///
/// The same payload arrives from the synchronous request surface and the
/// queue boundary; everything beyond the URL is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistillJob {
    /// Page URL, as ingested
    pub url: String,

    /// Caller instruction appended to the prompt verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_prompt: Option<String>,

    /// Model pipeline selection
    #[serde(default)]
    pub variant: ModelVariant,

    /// Per-job chunk size override (characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chunk_size: Option<usize>,

    /// Per-job output token budget override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl DistillJob {
    /// Create a job with defaults for everything but the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            additional_prompt: None,
            variant: ModelVariant::default(),
            max_chunk_size: None,
            max_tokens: None,
        }
    }

    /// Set the caller instruction.
    pub fn with_additional_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.additional_prompt = Some(prompt.into());
        self
    }

    /// Set the model variant.
    pub fn with_variant(mut self, variant: ModelVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Override the chunk size ceiling.
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = Some(size);
        self
    }

    /// Override the output token budget.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_gets_defaults() {
        let job: DistillJob = serde_json::from_str(r#"{"url": "https://example.org"}"#).unwrap();
        assert_eq!(job.variant, ModelVariant::RuleDriven);
        assert!(job.additional_prompt.is_none());
        assert!(job.max_chunk_size.is_none());
        assert!(job.max_tokens.is_none());
    }

    #[test]
    fn variant_round_trips_as_snake_case() {
        let job = DistillJob::new("https://example.org").with_variant(ModelVariant::FullText);
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains(r#""variant":"full_text""#));
        let back: DistillJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
