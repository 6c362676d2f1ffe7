//! Prompt templates and conversation assembly for digest generation.

use crate::types::prompt::PromptMessage;

/// Behavioral directive opening every digest conversation.
pub const SYSTEM_PROMPT: &str = r#"You turn web page content into a clean markdown digest for retrieval.

Rules:
1. Use only wording that appears verbatim in the provided chunks
2. Strip all links, images, and URLs
3. Never repeat information that already appears in the digest
4. Start the output with the page title as the top-level heading

Page title: {title}"#;

/// Label prefixing each content chunk; positions are 1-based.
pub const CHUNK_PROMPT: &str = "Chunk {index}:\n{chunk}";

/// Closing directive; the caller's instruction is appended verbatim.
pub const FINAL_PROMPT: &str =
    "Write the markdown digest now, using the content of every chunk, in the original language of the page.";

/// Format the system prompt with the page title.
pub fn format_system_prompt(title: &str) -> String {
    SYSTEM_PROMPT.replace("{title}", title)
}

/// Format one chunk message.
pub fn format_chunk_prompt(index: usize, chunk: &str) -> String {
    CHUNK_PROMPT
        .replace("{index}", &index.to_string())
        .replace("{chunk}", chunk)
}

/// Format the trailing instruction message.
pub fn format_final_prompt(instruction: &str) -> String {
    if instruction.trim().is_empty() {
        FINAL_PROMPT.to_string()
    } else {
        format!("{FINAL_PROMPT}\n{instruction}")
    }
}

/// Build the full conversation: the system directive with the title, one
/// user message per chunk labeled by position, and the trailing
/// instruction.
///
/// The order is the conversation the generation service sees — chunks are
/// never reordered or deduplicated.
pub fn assemble_messages(title: &str, chunks: &[String], instruction: &str) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(chunks.len() + 2);
    messages.push(PromptMessage::system(format_system_prompt(title)));
    for (index, chunk) in chunks.iter().enumerate() {
        messages.push(PromptMessage::user(format_chunk_prompt(index + 1, chunk)));
    }
    messages.push(PromptMessage::user(format_final_prompt(instruction)));
    messages
}
