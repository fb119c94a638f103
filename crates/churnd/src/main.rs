//! `churnd` — the telco churn prediction page.
//!
//! Serves a single interactive form; each press of Predict runs one
//! synchronous pass through the inference adapter against the pipeline
//! loaded at startup.
//!
//! The artifact is loaded before the listener binds: a missing or malformed
//! artifact halts the process with a diagnostic naming the file, and no form
//! is ever rendered.

mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;

use churn_model::{ChurnAdapter, ChurnPipeline};
use config::AppConfig;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load();

    // Fail fast: no artifact, no form.
    let pipeline = ChurnPipeline::from_file(&config.artifact_path).with_context(|| {
        format!(
            "model artifact '{}' could not be loaded; place the fitted pipeline JSON next to the binary",
            config.artifact_path.display()
        )
    })?;

    info!(
        artifact = %config.artifact_path.display(),
        pipeline_id = pipeline.pipeline_id(),
        pipeline_version = pipeline.pipeline_version(),
        "churn pipeline loaded"
    );

    let state = AppState {
        pipeline_id: pipeline.pipeline_id().to_string(),
        pipeline_version: pipeline.pipeline_version().to_string(),
        adapter: Arc::new(ChurnAdapter::new(pipeline)),
    };

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(listen = %config.listen_addr, "churnd serving the prediction form");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("churnd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown signal received");
}
