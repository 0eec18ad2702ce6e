mod analysis;
mod config;
mod errors;
mod llm_client;
mod metrics;
mod models;
mod optimization;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::optimization::{LlmDocumentAnalyzer, LlmResumeOptimizer, RunRegistry, TailoringService};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let registry = RunRegistry::new(config.max_stored_runs);
    let tailoring = TailoringService::new(
        Arc::new(LlmDocumentAnalyzer::new(llm.clone())),
        Arc::new(LlmResumeOptimizer::new(llm)),
        registry,
        config.optimization_tier,
        config.target_pages,
    );
    info!(
        "Default optimization tier: {:?}, target pages: {}, keeping up to {} runs",
        config.optimization_tier, config.target_pages, config.max_stored_runs
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        tailoring,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
