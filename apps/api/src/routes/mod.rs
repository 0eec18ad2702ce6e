pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::optimization::handlers as optimization;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless analysis
        .route("/api/v1/analysis/gap", post(analysis::handle_gap))
        .route(
            "/api/v1/analysis/authenticity",
            post(analysis::handle_authenticity),
        )
        .route("/api/v1/metrics", post(analysis::handle_metrics))
        // Optimization runs
        .route(
            "/api/v1/optimizations",
            post(optimization::handle_create_optimization),
        )
        .route(
            "/api/v1/optimizations/:id",
            get(optimization::handle_get_optimization),
        )
        .route(
            "/api/v1/optimizations/:id/versions/latest",
            get(optimization::handle_get_latest_version),
        )
        .route(
            "/api/v1/optimizations/:id/versions/:n",
            get(optimization::handle_get_version),
        )
        .route(
            "/api/v1/optimizations/:id/trajectory",
            get(optimization::handle_get_trajectory),
        )
        .route(
            "/api/v1/optimizations/:id/compare",
            get(optimization::handle_compare_versions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::optimization::{
        LlmDocumentAnalyzer, LlmResumeOptimizer, OptimizationTier, RunRegistry, TailoringService,
    };

    #[test]
    fn test_router_accepts_latest_alongside_numbered_versions() {
        let llm = LlmClient::new("test-key".to_string());
        let state = AppState {
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                optimization_tier: OptimizationTier::Basic,
                target_pages: 2.0,
                max_stored_runs: 4,
            },
            tailoring: TailoringService::new(
                Arc::new(LlmDocumentAnalyzer::new(llm.clone())),
                Arc::new(LlmResumeOptimizer::new(llm)),
                RunRegistry::new(4),
                OptimizationTier::Basic,
                2.0,
            ),
        };
        // Overlapping routes panic at registration.
        let _router = build_router(state);
    }
}
