use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("{stage} failed: {message}")]
    Collaborator { stage: String, message: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Failure of an LLM-backed collaborator (analysis or optimize-once).
/// The optimization loop decides whether this is fatal for a run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CollaboratorError {
    #[error("{stage} failed: {message}")]
    Analysis { stage: String, message: String },

    #[error("optimization failed: {message}")]
    Optimization { message: String },

    #[error("invalid collaborator output: {message}")]
    InvalidOutput { message: String },
}

impl CollaboratorError {
    pub fn stage(&self) -> &str {
        match self {
            CollaboratorError::Analysis { stage, .. } => stage,
            CollaboratorError::Optimization { .. } => "optimization",
            CollaboratorError::InvalidOutput { .. } => "output parsing",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CollaboratorError::Analysis { message, .. }
            | CollaboratorError::Optimization { message }
            | CollaboratorError::InvalidOutput { message } => message,
        }
    }

    pub fn analysis(stage: &str, err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => CollaboratorError::InvalidOutput {
                message: format!("{stage}: {e}"),
            },
            other => CollaboratorError::Analysis {
                stage: stage.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<LlmError> for CollaboratorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => CollaboratorError::InvalidOutput {
                message: e.to_string(),
            },
            other => CollaboratorError::Optimization {
                message: other.to_string(),
            },
        }
    }
}

impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        AppError::Collaborator {
            stage: err.stage().to_string(),
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Collaborator { stage, message } => {
                tracing::error!("Collaborator failure in {stage}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "COLLABORATOR_ERROR",
                    format!("{stage} failed: {message}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
