//! Rule store contract.

use async_trait::async_trait;

use crate::error::Result;

/// Read-only access to per-domain extraction rules.
///
/// Keys use the `domain:<host>` format produced by
/// [`crate::types::rules::domain_key`]; values are serialized rule lists.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch the serialized rule list for a domain key, if any.
    async fn get_rules(&self, domain_key: &str) -> Result<Option<String>>;
}
