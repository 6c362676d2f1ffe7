//! Generation service implementations.

pub mod openai;

pub use openai::OpenAiGenerator;
