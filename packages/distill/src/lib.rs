//! Rule-driven HTML distillation into markdown digests.
//!
//! `distill` converts previously-fetched raw HTML pages into clean
//! markdown summaries with a language model, for retrieval-augmented
//! generation. The library owns the transformation core — DOM extraction
//! driven by per-domain rules, size-bounded chunk splitting that never
//! breaks a tag or a word, and multi-chunk prompt assembly — and reaches
//! the platform (rule store, metadata store, content store, generation
//! service, queue) through narrow trait contracts.
//!
//! # Pipeline
//!
//! ```text
//! raw HTML ──► CleanDocument ──► fragments ──► chunks ──► messages ──► markdown
//!              (clean + rules)    (extract)     (split)    (assemble)   (generate)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use distill::testing::MockGenerator;
//! use distill::{run_digest, DistillConfig, DistillJob, MemoryStore, PageRecord, RunContext};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.put_page(PageRecord::new("https://example.org/post"), b"<html>...</html>".to_vec());
//!
//! let ctx = RunContext {
//!     metadata: store.clone(),
//!     content: store.clone(),
//!     rules: store,
//!     generator: Arc::new(MockGenerator::new()),
//!     config: DistillConfig::default(),
//! };
//! let report = run_digest(&ctx, &DistillJob::new("https://example.org/post")).await;
//! assert!(report.is_success());
//! ```
//!
//! # Modules
//!
//! - [`dom`] — lenient parse, cleanup, rule application, fallback
//! - [`chunk`] — tag-balancing, size-bounded splitting
//! - [`pipeline`] — prompts, variant strategy, run orchestration
//! - [`traits`] — collaborator contracts
//! - [`stores`] — in-memory and (optionally) Postgres implementations
//! - [`testing`] — scripted mocks

pub mod chunk;
pub mod dom;
pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core entry points at the crate root
pub use chunk::split_into_chunks;
pub use dom::{extract_content, CleanDocument};
pub use error::{DistillError, Result};
pub use pipeline::{assemble_messages, preprocess, run_digest, GenerationStrategy, RunContext};
pub use traits::{
    generator::Generator,
    queue::{Delivery, JobQueue},
    rules::RuleStore,
    store::{ContentStore, MetadataStore},
};
pub use types::{
    config::{DistillConfig, EmptyOutputPolicy, FragmentMode},
    content::{storage_key_for, ExtractedContent, PageRecord},
    job::{DistillJob, ModelVariant},
    outcome::{RunOutcome, RunReport},
    prompt::{PromptMessage, Role},
    rules::{domain_key, ExtractionRule, RuleSet, RuleType},
};

// Re-export stores
pub use stores::{MemoryJobQueue, MemoryStore};

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

#[cfg(feature = "openai")]
pub use ai::OpenAiGenerator;
