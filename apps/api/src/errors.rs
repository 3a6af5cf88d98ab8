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
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("Credential missing: {0}")]
    CredentialMissing(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a vendor error raised during one of the generation stages.
    /// A missing credential keeps its own category; everything else is a
    /// generation failure.
    pub fn from_llm(stage: &str, err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential(vendor) => AppError::CredentialMissing(format!(
                "{vendor} API key is not set"
            )),
            other => AppError::GenerationFailed(format!("{stage} failed: {other}")),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidProvider(_) => StatusCode::BAD_REQUEST,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::CredentialMissing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            AppError::InvalidInput(msg) => ("INVALID_INPUT", msg.clone()),
            AppError::InvalidProvider(msg) => (
                "INVALID_PROVIDER",
                format!("Unknown provider '{msg}'. Supported: openai, gemini"),
            ),
            AppError::CredentialMissing(msg) => {
                tracing::error!("Credential missing: {msg}");
                (
                    "CREDENTIAL_MISSING",
                    "The selected LLM provider is not configured".to_string(),
                )
            }
            AppError::GenerationFailed(msg) => {
                tracing::error!("Generation failed: {msg}");
                (
                    "GENERATION_FAILED",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
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
