//! Generation service contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::prompt::PromptMessage;

/// Text generation from an assembled prompt.
///
/// Implementations wrap a provider and fail by raising; the orchestrator
/// treats those failures as retryable.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for the conversation within an output token budget.
    async fn generate(
        &self,
        model: &str,
        messages: &[PromptMessage],
        max_tokens: u32,
    ) -> Result<String>;
}
