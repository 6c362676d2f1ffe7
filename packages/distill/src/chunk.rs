//! Size-bounded chunk splitting that never breaks a tag token or a word.
//!
//! Single streaming pass over the input. Tag tokens are buffered whole and
//! classified against an open-element stack; every chunk boundary closes
//! the open elements at its end and the next chunk reopens them in the
//! same nesting order, so each non-final chunk parses as balanced markup.

use tracing::debug;

use crate::error::{DistillError, Result};

/// Void elements never take closing tags, so they stay off the stack.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// What a complete tag token does to the open-element stack.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TagEffect {
    /// Opens an element that expects a closing tag
    Open(String),
    /// Closes the innermost matching open element
    Close(String),
    /// No stack effect: self-closing, void, comment, doctype, PI
    Neutral,
}

/// Split HTML or plain text into chunks of at most `max_chars` characters.
///
/// Guarantees:
/// - no chunk ends inside a tag token;
/// - splits land on space boundaries when the accumulated text has one
///   (a run with no usable space splits at the size limit instead);
/// - elements open at a boundary are closed at the chunk end and reopened
///   at the start of the next chunk, innermost closed first;
/// - the final chunk keeps its trailing open elements unclosed, since no
///   chunk follows to reopen them;
/// - identical input and limit produce identical chunks.
///
/// A single tag token longer than `max_chars` is kept whole, so chunks can
/// exceed the limit in that case. `max_chars` of zero is a configuration
/// error.
pub fn split_into_chunks(input: &str, max_chars: usize) -> Result<Vec<String>> {
    if max_chars == 0 {
        return Err(DistillError::Config(
            "max chunk size must be a positive number of characters".to_string(),
        ));
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut acc = String::new();
    let mut acc_chars = 0usize;
    let mut stack: Vec<String> = Vec::new();
    let mut tag_buf = String::new();
    let mut in_tag = false;

    for ch in input.chars() {
        if in_tag {
            tag_buf.push(ch);
            if ch == '>' {
                in_tag = false;
                match classify_tag(&tag_buf) {
                    TagEffect::Open(name) => stack.push(name),
                    TagEffect::Close(name) => {
                        if let Some(pos) = stack.iter().rposition(|open| *open == name) {
                            stack.remove(pos);
                        }
                    }
                    TagEffect::Neutral => {}
                }
                acc_chars += tag_buf.chars().count();
                acc.push_str(&tag_buf);
                tag_buf.clear();
                // The size threshold is never evaluated inside (or right
                // after) a tag token.
            }
            continue;
        }

        if ch == '<' {
            in_tag = true;
            tag_buf.push(ch);
            continue;
        }

        acc.push(ch);
        acc_chars += 1;

        if acc_chars >= max_chars {
            let (body, rest) = split_at_last_space(&acc);
            let open_at_split = rewind_stack(&stack, &rest);

            let mut chunk = body;
            for name in open_at_split.iter().rev() {
                chunk.push_str("</");
                chunk.push_str(name);
                chunk.push('>');
            }
            if !chunk.is_empty() {
                chunks.push(chunk);
            }

            let mut next = String::new();
            for name in &open_at_split {
                next.push('<');
                next.push_str(name);
                next.push('>');
            }
            next.push_str(&rest);
            acc_chars = next.chars().count();
            acc = next;
        }
    }

    if !tag_buf.is_empty() {
        // Truncated input; emitting the token would leave a chunk ending
        // mid-token.
        debug!(dangling = %tag_buf, "dropping unterminated trailing tag token");
    }
    if !acc.is_empty() {
        chunks.push(acc);
    }

    Ok(chunks)
}

/// Classify one complete `<...>` token.
fn classify_tag(token: &str) -> TagEffect {
    let inner = token
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();

    if inner.is_empty() || inner.starts_with('!') || inner.starts_with('?') {
        return TagEffect::Neutral;
    }
    if let Some(rest) = inner.strip_prefix('/') {
        let name = tag_name(rest);
        if name.is_empty() {
            return TagEffect::Neutral;
        }
        return TagEffect::Close(name);
    }
    if inner.ends_with('/') {
        return TagEffect::Neutral;
    }
    let name = tag_name(inner);
    if name.is_empty() || VOID_ELEMENTS.contains(&name.as_str()) {
        return TagEffect::Neutral;
    }
    TagEffect::Open(name)
}

/// Element name: everything up to the first whitespace or delimiter,
/// lowercased.
fn tag_name(inner: &str) -> String {
    inner
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Locate the last space usable as a split point.
///
/// Spaces inside complete tag tokens are not boundaries (the backward
/// scan flips into tag state on `>` and out on `<`). The space itself is
/// consumed. With no usable space the whole accumulator becomes the body.
fn split_at_last_space(acc: &str) -> (String, String) {
    let mut in_tag = false;
    for (idx, ch) in acc.char_indices().rev() {
        match ch {
            '>' => in_tag = true,
            '<' => in_tag = false,
            ' ' if !in_tag => {
                return (acc[..idx].to_string(), acc[idx + 1..].to_string());
            }
            _ => {}
        }
    }
    (acc.to_string(), String::new())
}

/// Stack state as of the split point.
///
/// The live stack reflects everything scanned so far, including tag
/// tokens sitting in the carried-over remainder; their effects are undone
/// in reverse so the boundary closes exactly what was open at the split.
fn rewind_stack(stack: &[String], rest: &str) -> Vec<String> {
    let mut effects = Vec::new();
    let mut tag = String::new();
    let mut in_tag = false;
    for ch in rest.chars() {
        if in_tag {
            tag.push(ch);
            if ch == '>' {
                in_tag = false;
                effects.push(classify_tag(&tag));
                tag.clear();
            }
        } else if ch == '<' {
            in_tag = true;
            tag.push(ch);
        }
    }

    let mut snapshot: Vec<String> = stack.to_vec();
    for effect in effects.iter().rev() {
        match effect {
            TagEffect::Open(name) => {
                if let Some(pos) = snapshot.iter().rposition(|open| open == name) {
                    snapshot.remove(pos);
                }
            }
            TagEffect::Close(name) => snapshot.push(name.clone()),
            TagEffect::Neutral => {}
        }
    }
    snapshot
}
