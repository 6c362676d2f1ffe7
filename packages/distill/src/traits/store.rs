//! Storage contracts: page metadata and raw/generated content objects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::content::PageRecord;

/// Keyed metadata lookup and the generated-at stamp.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Find the record for a URL, if the page was ever ingested.
    async fn find_by_url(&self, url: &str) -> Result<Option<PageRecord>>;

    /// Record when a digest was generated for a page.
    async fn mark_generated(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

/// Raw and generated objects, by opaque key.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch an object's bytes.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store an object, overwriting any previous value.
    async fn put(&self, key: &str, body: &[u8]) -> Result<()>;
}
