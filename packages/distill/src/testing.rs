//! Test doubles for applications built on the library.
//!
//! The scripted generator avoids real LLM calls while recording enough
//! about each invocation to assert on prompt shape.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{DistillError, Result};
use crate::traits::generator::Generator;
use crate::types::prompt::PromptMessage;

/// Record of one `generate` call.
#[derive(Debug, Clone)]
pub struct GeneratorCall {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
}

/// Scripted Generator: queued responses, optional failure injection,
/// recorded calls.
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<RwLock<VecDeque<String>>>,
    fail_with: Arc<RwLock<Option<String>>>,
    calls: Arc<RwLock<Vec<GeneratorCall>>>,
}

impl MockGenerator {
    /// Create a mock with a default response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response. Responses are consumed in order; the last one
    /// repeats for further calls.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(text.into());
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with.write().unwrap() = Some(message.into());
        self
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        model: &str,
        messages: &[PromptMessage],
        max_tokens: u32,
    ) -> Result<String> {
        self.calls.write().unwrap().push(GeneratorCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens,
        });

        if let Some(message) = self.fail_with.read().unwrap().clone() {
            return Err(DistillError::Generation(message.into()));
        }

        let mut responses = self.responses.write().unwrap();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        Ok(response.unwrap_or_else(|| "# Digest\n\nGenerated for testing.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let generator = MockGenerator::new().with_response("one").with_response("two");
        let messages = [PromptMessage::user("hi")];

        assert_eq!(generator.generate("m", &messages, 10).await.unwrap(), "one");
        assert_eq!(generator.generate("m", &messages, 10).await.unwrap(), "two");
        // The last response repeats.
        assert_eq!(generator.generate("m", &messages, 10).await.unwrap(), "two");
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn failures_are_injected() {
        let generator = MockGenerator::new().failing("boom");
        let err = generator
            .generate("m", &[PromptMessage::user("hi")], 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DistillError::Generation(_)));
    }
}
