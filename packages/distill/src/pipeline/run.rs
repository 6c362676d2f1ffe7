//! The run orchestrator: metadata → content → extract/split → generate →
//! persist, with outcome classification.
//!
//! Lower components raise typed errors or return best-effort results;
//! retryability is decided here and nowhere else.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{DistillError, Result};
use crate::pipeline::prompts::assemble_messages;
use crate::pipeline::strategy::{preprocess, GenerationStrategy};
use crate::traits::generator::Generator;
use crate::traits::rules::RuleStore;
use crate::traits::store::{ContentStore, MetadataStore};
use crate::types::config::{DistillConfig, EmptyOutputPolicy};
use crate::types::job::DistillJob;
use crate::types::outcome::{RunOutcome, RunReport};
use crate::types::rules::{domain_key, RuleSet};

/// Collaborator handles and configuration for digest runs.
///
/// Passed explicitly into the orchestrator; the core keeps no ambient
/// state.
#[derive(Clone)]
pub struct RunContext {
    pub metadata: Arc<dyn MetadataStore>,
    pub content: Arc<dyn ContentStore>,
    pub rules: Arc<dyn RuleStore>,
    pub generator: Arc<dyn Generator>,
    pub config: DistillConfig,
}

/// Run one digest job to a classified outcome.
///
/// Never returns an error: every failure folds into the report.
pub async fn run_digest(ctx: &RunContext, job: &DistillJob) -> RunReport {
    match run_inner(ctx, job).await {
        Ok(markdown) => {
            info!(url = %job.url, "digest generated");
            RunReport::success(markdown)
        }
        Err(err) => classify(ctx, job, err),
    }
}

async fn run_inner(ctx: &RunContext, job: &DistillJob) -> Result<String> {
    let strategy = GenerationStrategy::for_variant(job.variant, &ctx.config);
    let max_chunk_size = job.max_chunk_size.unwrap_or(ctx.config.max_chunk_size);
    let max_tokens = job.max_tokens.unwrap_or(ctx.config.max_output_tokens);

    // Absence here means the URL was never ingested; retrying cannot help.
    let record = ctx
        .metadata
        .find_by_url(&job.url)
        .await?
        .ok_or_else(|| DistillError::PageNotFound {
            url: job.url.clone(),
        })?;
    debug!(url = %job.url, id = %record.id, "metadata loaded");

    let raw = ctx
        .content
        .get(&record.storage_key)
        .await?
        .ok_or_else(|| DistillError::ContentMissing {
            key: record.storage_key.clone(),
        })?;
    let html = String::from_utf8(raw)?;

    let rules = if strategy.use_domain_rules {
        fetch_rules(ctx, &job.url).await?
    } else {
        RuleSet::empty()
    };

    let (title, chunks) = preprocess(&html, &rules, &strategy, max_chunk_size)?;
    debug!(url = %job.url, chunks = chunks.len(), "content prepared");

    let instruction = job.additional_prompt.as_deref().unwrap_or("");
    let messages = assemble_messages(&title, &chunks, instruction);

    let markdown = ctx
        .generator
        .generate(&strategy.model, &messages, max_tokens)
        .await?;
    if markdown.trim().is_empty() {
        return Err(DistillError::EmptyOutput);
    }

    // Persist, then stamp the metadata. Not transactional: a write that
    // lands without the stamp is retried last-write-wins.
    ctx.content
        .put(&record.markdown_key(), markdown.as_bytes())
        .await?;
    ctx.metadata.mark_generated(record.id, Utc::now()).await?;

    Ok(markdown)
}

/// Fetch and parse the domain's rule snapshot.
///
/// Bad data in the rule store must not fail the run; the whole-body
/// fallback still produces a digest.
async fn fetch_rules(ctx: &RunContext, url: &str) -> Result<RuleSet> {
    let key = domain_key(url)?;
    match ctx.rules.get_rules(&key).await? {
        Some(text) => match RuleSet::parse(&text) {
            Ok(rules) => {
                debug!(%key, rules = rules.len(), "rules loaded");
                Ok(rules)
            }
            Err(err) => {
                warn!(%key, %err, "unparsable rule list, falling back to whole body");
                Ok(RuleSet::empty())
            }
        },
        None => Ok(RuleSet::empty()),
    }
}

/// Map an error onto the outcome taxonomy. Only this function decides
/// retryability.
fn classify(ctx: &RunContext, job: &DistillJob, err: DistillError) -> RunReport {
    let report = match &err {
        DistillError::PageNotFound { .. } | DistillError::ContentMissing { .. } => {
            RunReport::hard_fail(404, err.to_string())
        }
        DistillError::NoUsableContent
        | DistillError::InvalidUrl(_)
        | DistillError::Config(_) => RunReport::hard_fail(500, err.to_string()),
        DistillError::EmptyOutput => match ctx.config.empty_output {
            EmptyOutputPolicy::HardFail => RunReport::hard_fail(500, err.to_string()),
            EmptyOutputPolicy::SoftFail => RunReport::soft_fail(err.to_string()),
        },
        _ => RunReport::soft_fail(err.to_string()),
    };

    match report.outcome {
        RunOutcome::HardFail => warn!(url = %job.url, error = %err, "digest hard-failed"),
        RunOutcome::SoftFail => warn!(url = %job.url, error = %err, "digest soft-failed, retryable"),
        RunOutcome::Success => {}
    }
    report
}
