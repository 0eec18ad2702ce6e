use anyhow::{Context, Result};

use crate::optimization::OptimizationTier;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Tier used when a request names neither a tier nor an explicit config.
    pub optimization_tier: OptimizationTier,
    pub target_pages: f64,
    pub max_stored_runs: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", "8080")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            optimization_tier: OptimizationTier::from_name(
                &std::env::var("OPTIMIZATION_TIER").unwrap_or_else(|_| "standard".to_string()),
            ),
            target_pages: parse_env("TARGET_PAGES", "2")?,
            max_stored_runs: parse_env("MAX_STORED_RUNS", "50")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>()))
}
