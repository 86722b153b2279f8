//! Web front end: upload form, ranked results, and fruit info pages.

mod error;
mod routes;
mod templates;

pub use error::AppError;
pub use templates::Templates;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use knowfruit_core::client::resolve_env_var;
use knowfruit_core::client::retry::{backoff_duration, is_retryable};
use knowfruit_core::config::PipelineConfig;
use knowfruit_core::{
    Config, FruitInfoStore, InferencePipeline, KnowFruitError, PipelineError, RankedLabels,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and headers on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared, read-only state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<InferencePipeline>,
    fruit_info: Arc<FruitInfoStore>,
    templates: Arc<Templates>,
    retry: PipelineConfig,
    request_timeout: Duration,
    static_dir: PathBuf,
    body_limit: usize,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(
        config: &Config,
        pipeline: InferencePipeline,
        fruit_info: FruitInfoStore,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            pipeline: Arc::new(pipeline),
            fruit_info: Arc::new(fruit_info),
            templates: Arc::new(Templates::new()?),
            retry: config.pipeline.clone(),
            request_timeout: Duration::from_millis(config.limits.request_timeout_ms),
            static_dir: config.static_dir(),
            body_limit: usize::try_from(config.limits.max_upload_mb)
                .unwrap_or(usize::MAX)
                .saturating_mul(1024 * 1024)
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        })
    }

    /// Build production state. Any configuration problem is fatal here.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if resolve_env_var(&config.model.access_token).is_none() {
            tracing::warn!(
                "No access token configured for model {}; requests will be unauthenticated",
                config.model.name
            );
        }
        let pipeline = InferencePipeline::from_config(config)?;
        let fruit_info = FruitInfoStore::load(&config.fruit_info_path())?;

        for missing in fruit_info.check_coverage(pipeline.class_names()) {
            tracing::warn!("No fruit info entry for class '{missing}'");
        }

        Self::new(config, pipeline, fruit_info)
    }

    /// Classify an upload under the request timeout, retrying transient
    /// inference failures as configured.
    pub async fn classify(&self, bytes: Vec<u8>) -> Result<RankedLabels, KnowFruitError> {
        let mut attempt = 0;
        loop {
            let result = match tokio::time::timeout(
                self.request_timeout,
                self.pipeline.classify(bytes.clone()),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(PipelineError::Timeout {
                    stage: "classify".to_string(),
                    timeout_ms: self.request_timeout.as_millis() as u64,
                }
                .into()),
            };

            match result {
                Err(KnowFruitError::Pipeline(ref err))
                    if attempt < self.retry.retry_attempts && is_retryable(err) =>
                {
                    let delay = backoff_duration(attempt, self.retry.retry_delay_ms);
                    tracing::warn!("Classification failed ({err}); retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// Construct the router with all pages.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let body_limit = state.body_limit;

    Router::new()
        .route("/", get(routes::upload_form).post(routes::upload))
        .route("/fruits/{name}", get(routes::fruit_page))
        .route("/health", get(routes::health))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
