//! Queue boundary contract.
//!
//! Success and hard failures acknowledge a delivery; soft failures
//! request redelivery. The transport behind the trait is the platform's
//! concern.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::job::DistillJob;

/// One delivery of a job, with its 1-based attempt count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub job: DistillJob,
    pub attempt: u32,
}

impl Delivery {
    /// A first-attempt delivery.
    pub fn first(job: DistillJob) -> Self {
        Self { job, attempt: 1 }
    }
}

/// Work distribution for asynchronous digest jobs.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Accept a job for later processing.
    async fn enqueue(&self, job: DistillJob) -> Result<()>;

    /// Next delivery; `None` when the queue is closed.
    async fn next(&self) -> Result<Option<Delivery>>;

    /// Settle the delivery permanently.
    async fn ack(&self, delivery: &Delivery) -> Result<()>;

    /// Put the delivery back with an incremented attempt count.
    async fn redeliver(&self, delivery: Delivery) -> Result<()>;
}
