//! Environment-driven server configuration.

use anyhow::{Context, Result};
use distill::{DistillConfig, EmptyOutputPolicy};

/// Server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port
    pub port: u16,

    /// OpenAI-compatible API key
    pub openai_api_key: String,

    /// Optional OpenAI-compatible base URL override
    pub openai_base_url: Option<String>,

    /// Postgres connection string; in-memory stores when absent
    pub database_url: Option<String>,

    /// Include generated markdown in synchronous responses
    pub return_markdown: bool,

    /// Worker concurrency ceiling
    pub worker_concurrency: usize,

    /// Soft-failure redelivery cap
    pub max_delivery_attempts: u32,

    /// Core library configuration
    pub distill: DistillConfig,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let port = env_or("PORT", "8080")
            .parse()
            .context("PORT must be a number")?;
        let openai_api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is required")?;
        let openai_base_url = std::env::var("OPENAI_BASE_URL").ok();
        let database_url = std::env::var("DATABASE_URL").ok();
        let return_markdown = env_or("RETURN_MARKDOWN", "true")
            .parse()
            .context("RETURN_MARKDOWN must be true or false")?;
        let worker_concurrency = env_or("WORKER_CONCURRENCY", "4")
            .parse()
            .context("WORKER_CONCURRENCY must be a number")?;
        let max_delivery_attempts = env_or("MAX_DELIVERY_ATTEMPTS", "5")
            .parse()
            .context("MAX_DELIVERY_ATTEMPTS must be a number")?;

        let mut distill = DistillConfig::default();
        if let Ok(model) = std::env::var("PRIMARY_MODEL") {
            distill = distill.with_primary_model(model);
        }
        if let Ok(model) = std::env::var("SECONDARY_MODEL") {
            distill = distill.with_secondary_model(model);
        }
        if let Ok(size) = std::env::var("MAX_CHUNK_SIZE") {
            distill = distill
                .with_max_chunk_size(size.parse().context("MAX_CHUNK_SIZE must be a number")?);
        }
        if let Ok(tokens) = std::env::var("MAX_OUTPUT_TOKENS") {
            distill = distill.with_max_output_tokens(
                tokens.parse().context("MAX_OUTPUT_TOKENS must be a number")?,
            );
        }
        match env_or("EMPTY_OUTPUT_POLICY", "hard_fail").as_str() {
            "hard_fail" => {}
            "soft_fail" => distill = distill.with_empty_output(EmptyOutputPolicy::SoftFail),
            other => anyhow::bail!("EMPTY_OUTPUT_POLICY must be hard_fail or soft_fail, got {other}"),
        }

        Ok(Self {
            port,
            openai_api_key,
            openai_base_url,
            database_url,
            return_markdown,
            worker_concurrency,
            max_delivery_attempts,
            distill,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
