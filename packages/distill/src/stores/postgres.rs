//! Postgres-backed collaborator implementations.
//!
//! Runtime queries only (no compile-time checking), so the crate builds
//! without a database. The schema is bootstrapped idempotently on
//! connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::{DistillError, Result};
use crate::traits::rules::RuleStore;
use crate::traits::store::{ContentStore, MetadataStore};
use crate::types::content::PageRecord;

/// Rule, metadata, and content storage over a Postgres pool.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (schema assumed present).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<()> {
        for statement in [
            r#"
            CREATE TABLE IF NOT EXISTS extraction_rules (
                domain_key TEXT PRIMARY KEY,
                rules TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                id UUID PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                storage_key TEXT NOT NULL,
                generated_at TIMESTAMPTZ
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS objects (
                key TEXT PRIMARY KEY,
                body BYTEA NOT NULL
            )
            "#,
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        }
        Ok(())
    }

    /// Insert or update a page record (ingestion-side helper).
    pub async fn upsert_record(&self, record: &PageRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pages (id, url, storage_key, generated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (url) DO UPDATE
                SET storage_key = EXCLUDED.storage_key,
                    generated_at = EXCLUDED.generated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.url)
        .bind(&record.storage_key)
        .bind(record.generated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    /// Insert or update a domain's rule list (operator-side helper).
    pub async fn put_rules(&self, domain_key: &str, rules_json: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO extraction_rules (domain_key, rules)
            VALUES ($1, $2)
            ON CONFLICT (domain_key) DO UPDATE SET rules = EXCLUDED.rules
            "#,
        )
        .bind(domain_key)
        .bind(rules_json)
        .execute(&self.pool)
        .await
        .map_err(|err| DistillError::RuleStore(Box::new(err)))?;
        Ok(())
    }
}

fn storage_err(err: sqlx::Error) -> DistillError {
    DistillError::Storage(Box::new(err))
}

#[async_trait]
impl RuleStore for PostgresStore {
    async fn get_rules(&self, domain_key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT rules FROM extraction_rules WHERE domain_key = $1")
            .bind(domain_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| DistillError::RuleStore(Box::new(err)))?;
        Ok(row.map(|row| row.get("rules")))
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<PageRecord>> {
        let record = sqlx::query_as::<_, PageRecord>(
            "SELECT id, url, storage_key, generated_at FROM pages WHERE url = $1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(record)
    }

    async fn mark_generated(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE pages SET generated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let row = sqlx::query("SELECT body FROM objects WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.map(|row| row.get("body")))
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO objects (key, body)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET body = EXCLUDED.body
            "#,
        )
        .bind(key)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}
