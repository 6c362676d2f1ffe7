//! Digest pipeline: prompt assembly, variant strategy, run orchestration.

pub mod prompts;
pub mod run;
pub mod strategy;

pub use prompts::{
    assemble_messages, format_chunk_prompt, format_final_prompt, format_system_prompt,
};
pub use run::{run_digest, RunContext};
pub use strategy::{preprocess, GenerationStrategy};
