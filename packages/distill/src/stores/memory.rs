//! In-memory collaborator implementations for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{DistillError, Result};
use crate::traits::queue::{Delivery, JobQueue};
use crate::traits::rules::RuleStore;
use crate::traits::store::{ContentStore, MetadataStore};
use crate::types::content::PageRecord;
use crate::types::job::DistillJob;

/// In-memory rule, metadata, and content storage.
///
/// Useful for tests and development; data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    rules: RwLock<HashMap<String, String>>,
    records: RwLock<HashMap<String, PageRecord>>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a serialized rule list under a domain key.
    pub fn put_rules(&self, domain_key: impl Into<String>, rules_json: impl Into<String>) {
        self.rules
            .write()
            .unwrap()
            .insert(domain_key.into(), rules_json.into());
    }

    /// Seed an ingested page: its metadata record plus the raw object.
    pub fn put_page(&self, record: PageRecord, raw: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .unwrap()
            .insert(record.storage_key.clone(), raw.into());
        self.put_record(record);
    }

    /// Seed a metadata record without a raw object.
    pub fn put_record(&self, record: PageRecord) {
        self.records
            .write()
            .unwrap()
            .insert(record.url.clone(), record);
    }

    /// Current record for a URL.
    pub fn record_for_url(&self, url: &str) -> Option<PageRecord> {
        self.records.read().unwrap().get(url).cloned()
    }

    /// Stored object bytes.
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().unwrap().get(key).cloned()
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn get_rules(&self, domain_key: &str) -> Result<Option<String>> {
        Ok(self.rules.read().unwrap().get(domain_key).cloned())
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<PageRecord>> {
        Ok(self.records.read().unwrap().get(url).cloned())
    }

    async fn mark_generated(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.write().unwrap();
        match records.values_mut().find(|record| record.id == id) {
            Some(record) => {
                record.generated_at = Some(at);
                Ok(())
            }
            None => Err(DistillError::Storage(
                format!("no record with id {id}").into(),
            )),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.read().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

/// In-process queue with redelivery, backed by an unbounded channel.
pub struct MemoryJobQueue {
    tx: UnboundedSender<Delivery>,
    rx: Mutex<UnboundedReceiver<Delivery>>,
}

impl MemoryJobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

impl Default for MemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(&self, job: DistillJob) -> Result<()> {
        self.tx
            .send(Delivery::first(job))
            .map_err(|err| DistillError::Queue(err.to_string().into()))
    }

    async fn next(&self) -> Result<Option<Delivery>> {
        Ok(self.rx.lock().await.recv().await)
    }

    async fn ack(&self, _delivery: &Delivery) -> Result<()> {
        Ok(())
    }

    async fn redeliver(&self, mut delivery: Delivery) -> Result<()> {
        delivery.attempt += 1;
        self.tx
            .send(delivery)
            .map_err(|err| DistillError::Queue(err.to_string().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rules_round_trip() {
        let store = MemoryStore::new();
        store.put_rules("domain:example.org", r#"[{"type":"css","selector":"#m"}]"#);

        let text = store.get_rules("domain:example.org").await.unwrap();
        assert!(text.unwrap().contains("#m"));
        assert!(store.get_rules("domain:other.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_generated_requires_a_known_id() {
        let store = MemoryStore::new();
        let record = PageRecord::new("https://example.org");
        let id = record.id;
        store.put_record(record);

        store.mark_generated(id, Utc::now()).await.unwrap();
        assert!(store
            .record_for_url("https://example.org")
            .unwrap()
            .generated_at
            .is_some());

        assert!(store.mark_generated(Uuid::new_v4(), Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn queue_increments_attempts_on_redelivery() {
        let queue = MemoryJobQueue::new();
        queue.enqueue(DistillJob::new("https://example.org")).await.unwrap();

        let delivery = queue.next().await.unwrap().unwrap();
        assert_eq!(delivery.attempt, 1);

        queue.redeliver(delivery).await.unwrap();
        let delivery = queue.next().await.unwrap().unwrap();
        assert_eq!(delivery.attempt, 2);
        queue.ack(&delivery).await.unwrap();
    }
}
