//! Iterative resume optimization: LLM collaborators behind traits, the
//! convergence-driven controller, the version log and the run service.

pub mod config;
pub mod controller;
pub mod extraction;
pub mod handlers;
pub mod optimizer;
pub mod prompts;
pub mod service;
pub mod versions;

pub use config::{OptimizationConfig, OptimizationTier, ResumeStyle};
pub use extraction::{DocumentAnalyzer, LlmDocumentAnalyzer};
pub use optimizer::{LlmResumeOptimizer, ResumeOptimizer};
pub use service::{RunRegistry, TailoringService};
