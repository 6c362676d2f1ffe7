//! OpenAI-compatible implementation of the Generator trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use distill::ai::OpenAiGenerator;
//!
//! let generator = OpenAiGenerator::from_env()?
//!     .with_base_url("https://proxy.internal/v1");
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DistillError, Result};
use crate::traits::generator::Generator;
use crate::types::prompt::PromptMessage;

/// Chat-completions client for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.0,
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| DistillError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Point at a different OpenAI-compatible endpoint (Azure, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the sampling temperature (default 0.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(
        &self,
        model: &str,
        messages: &[PromptMessage],
        max_tokens: u32,
    ) -> Result<String> {
        debug!(model, messages = messages.len(), max_tokens, "calling chat completions");

        let request = ChatRequest {
            model,
            messages,
            temperature: self.temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(generation_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DistillError::Generation(
                format!("chat completions returned {status}: {body}").into(),
            ));
        }

        let parsed: ChatResponse = response.json().await.map_err(generation_err)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DistillError::Generation("response contained no choices".into()))
    }
}

fn generation_err(err: reqwest::Error) -> DistillError {
    DistillError::Generation(Box::new(err))
}
