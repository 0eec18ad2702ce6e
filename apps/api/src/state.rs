use crate::config::Config;
use crate::optimization::TailoringService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the LLM collaborators and the in-memory run registry.
    pub tailoring: TailoringService,
}
