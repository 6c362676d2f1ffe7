//! Extracted content and page metadata records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Title and content fragments pulled out of one parsed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Document title, empty when the page has no `<title>`
    pub title: String,

    /// Ordered fragments, one per matched rule (or one fallback fragment)
    pub fragments: Vec<String>,
}

impl ExtractedContent {
    /// Create extracted content.
    pub fn new(title: impl Into<String>, fragments: Vec<String>) -> Self {
        Self {
            title: title.into(),
            fragments,
        }
    }

    /// No fragment survived extraction — no usable content.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Length of the largest fragment, in characters.
    pub fn max_fragment_chars(&self) -> usize {
        self.fragments
            .iter()
            .map(|f| f.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Metadata store record for an ingested page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct PageRecord {
    /// Record id
    pub id: Uuid,

    /// Canonical page URL
    pub url: String,

    /// Content store key of the raw HTML object
    pub storage_key: String,

    /// When a digest was last generated for this page
    pub generated_at: Option<DateTime<Utc>>,
}

impl PageRecord {
    /// Create a record for a URL with a derived storage key.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let storage_key = storage_key_for(&url);
        Self {
            id: Uuid::new_v4(),
            url,
            storage_key,
            generated_at: None,
        }
    }

    /// Override the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Content store key of the generated markdown, derived from the raw
    /// key so duplicate runs land on the same object.
    pub fn markdown_key(&self) -> String {
        format!("{}.md", self.storage_key)
    }
}

/// Deterministic storage key for a URL's raw content (hex SHA-256).
pub fn storage_key_for(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_deterministic() {
        let a = storage_key_for("https://example.org/page");
        let b = storage_key_for("https://example.org/page");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // SHA-256 hex
        assert_ne!(a, storage_key_for("https://example.org/other"));
    }

    #[test]
    fn markdown_key_derives_from_the_raw_key() {
        let record = PageRecord::new("https://example.org/page");
        assert_eq!(record.markdown_key(), format!("{}.md", record.storage_key));
        assert!(record.generated_at.is_none());
    }

    #[test]
    fn max_fragment_chars_counts_characters() {
        let content = ExtractedContent::new("t", vec!["ab".into(), "abcd".into()]);
        assert_eq!(content.max_fragment_chars(), 4);
        assert_eq!(ExtractedContent::new("t", vec![]).max_fragment_chars(), 0);
    }
}
