//! Digest request surface: synchronous runs and job enqueueing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use distill::{run_digest, DistillJob};

use crate::app::AppState;

/// Response body mirroring the run classification.
#[derive(Serialize)]
pub struct DigestResponse {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

/// Run a digest synchronously; the HTTP status mirrors the outcome.
pub async fn digest_handler(
    State(state): State<AppState>,
    Json(job): Json<DistillJob>,
) -> (StatusCode, Json<DigestResponse>) {
    info!(url = %job.url, "synchronous digest requested");

    let report = run_digest(&state.ctx, &job).await;
    let status =
        StatusCode::from_u16(report.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let markdown = if state.return_markdown {
        report.markdown
    } else {
        None
    };

    (
        status,
        Json(DigestResponse {
            message: report.message,
            status: report.status,
            markdown,
        }),
    )
}

/// Accept a job for asynchronous processing.
pub async fn enqueue_handler(
    State(state): State<AppState>,
    Json(job): Json<DistillJob>,
) -> (StatusCode, Json<DigestResponse>) {
    info!(url = %job.url, "digest job enqueued");

    match state.queue.enqueue(job).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(DigestResponse {
                message: "accepted".to_string(),
                status: 202,
                markdown: None,
            }),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DigestResponse {
                message: err.to_string(),
                status: 500,
                markdown: None,
            }),
        ),
    }
}
