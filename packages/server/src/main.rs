// Main entry point for the digest service

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distill::{MemoryJobQueue, MemoryStore, OpenAiGenerator, PostgresStore, RunContext};
use server_core::app::{build_app, AppState};
use server_core::config::Config;
use server_core::worker::run_worker;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,distill=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting digest service");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let mut generator = OpenAiGenerator::new(config.openai_api_key.clone());
    if let Some(base_url) = &config.openai_base_url {
        generator = generator.with_base_url(base_url.clone());
    }
    let generator: Arc<dyn distill::Generator> = Arc::new(generator);

    let ctx = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let store = Arc::new(
                PostgresStore::connect(database_url)
                    .await
                    .context("Failed to connect to database")?,
            );
            tracing::info!("Database connected");
            RunContext {
                metadata: store.clone(),
                content: store.clone(),
                rules: store,
                generator,
                config: config.distill.clone(),
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            let store = Arc::new(MemoryStore::new());
            RunContext {
                metadata: store.clone(),
                content: store.clone(),
                rules: store,
                generator,
                config: config.distill.clone(),
            }
        }
    };
    let ctx = Arc::new(ctx);

    // The worker drains the in-process queue alongside the HTTP surface.
    let queue = Arc::new(MemoryJobQueue::new());
    tokio::spawn(run_worker(
        ctx.clone(),
        queue.clone(),
        config.worker_concurrency,
        config.max_delivery_attempts,
    ));

    let state = AppState {
        ctx,
        queue,
        return_markdown: config.return_markdown,
    };
    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
