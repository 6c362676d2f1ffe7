//! Background worker draining the job queue.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use distill::{run_digest, Delivery, JobQueue, RunContext, RunOutcome};

/// Pull deliveries until the queue closes, running up to `concurrency`
/// digests at once.
///
/// Runs are fully independent; nothing is shared across them but the
/// context handles.
pub async fn run_worker(
    ctx: Arc<RunContext>,
    queue: Arc<dyn JobQueue>,
    concurrency: usize,
    max_attempts: u32,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency));
    info!(concurrency, max_attempts, "worker started");

    loop {
        let delivery = match queue.next().await {
            Ok(Some(delivery)) => delivery,
            Ok(None) => {
                info!("queue closed, worker stopping");
                break;
            }
            Err(err) => {
                error!(error = %err, "failed to pull from queue");
                continue;
            }
        };

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let ctx = ctx.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            let _permit = permit;
            process_delivery(&ctx, queue.as_ref(), delivery, max_attempts).await;
        });
    }
}

/// Run one delivery and settle it against the queue.
///
/// Success and hard failures acknowledge; soft failures redeliver until
/// the attempt cap, then acknowledge with an error log.
pub async fn process_delivery(
    ctx: &RunContext,
    queue: &dyn JobQueue,
    delivery: Delivery,
    max_attempts: u32,
) {
    let url = delivery.job.url.clone();
    let report = run_digest(ctx, &delivery.job).await;

    let settled = match report.outcome {
        RunOutcome::Success => {
            info!(%url, attempt = delivery.attempt, "digest job completed");
            queue.ack(&delivery).await
        }
        RunOutcome::HardFail => {
            warn!(%url, attempt = delivery.attempt, message = %report.message, "digest job dropped");
            queue.ack(&delivery).await
        }
        RunOutcome::SoftFail if delivery.attempt < max_attempts => {
            warn!(%url, attempt = delivery.attempt, message = %report.message, "digest job redelivered");
            queue.redeliver(delivery).await
        }
        RunOutcome::SoftFail => {
            error!(%url, attempt = delivery.attempt, message = %report.message, "digest job exhausted its attempts");
            queue.ack(&delivery).await
        }
    };

    if let Err(err) = settled {
        error!(%url, error = %err, "failed to settle delivery");
    }
}
