//! Axum route handlers for the outreach API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::AppError;
use crate::outreach::normalizer::{normalize, GenerateResponse};
use crate::outreach::orchestrator::Provider;
use crate::outreach::profile::Profile;
use crate::outreach::record::{OutreachRecord, RecordContext};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub profile: Option<Profile>,
    pub current_url: Option<String>,
    pub campaign_id: Option<String>,
    pub thesis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SetProviderRequest {
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub provider: Provider,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
///
/// Screens the profile and, for good fits, drafts a message. Failures return the
/// same response shape with `icpFit: "unknown"` and a generic error: 400 for a
/// bad request, 500 when generation fails.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<GenerateResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected generate request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(GenerateResponse::failure("Invalid request body")),
            );
        }
    };
    let Some(profile) = request.profile else {
        return (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::failure("Missing profile data")),
        );
    };
    if let Err(e) = profile.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(GenerateResponse::failure(e.to_string())),
        );
    }

    let thesis = request
        .thesis
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| state.config.default_thesis.clone());

    let (provider, result) = match state
        .orchestrator
        .generate(profile.clone(), &thesis, &state.config.icp_description)
        .await
    {
        Ok(dispatched) => dispatched,
        Err(e) => {
            error!("Generation for {} failed: {e}", profile.name);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateResponse::failure("LLM generation failed")),
            );
        }
    };

    let record = OutreachRecord::new(
        &profile.clone().with_derived_first_name(),
        &result,
        provider,
        RecordContext {
            campaign_id: request.campaign_id.as_deref(),
            current_url: request.current_url.as_deref(),
            thesis: &thesis,
        },
    );
    state.outreach_log.dispatch(record);

    (StatusCode::OK, Json(normalize(result)))
}

/// GET /api/get-prompt
pub async fn handle_get_prompt(State(state): State<AppState>) -> Json<PromptResponse> {
    Json(PromptResponse {
        prompt: state.prompt_store.get().await,
    })
}

/// POST /api/update-prompt
pub async fn handle_update_prompt(
    State(state): State<AppState>,
    Json(request): Json<UpdatePromptRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let prompt = request
        .prompt
        .ok_or_else(|| AppError::InvalidInput("Prompt string is required".to_string()))?;
    state.prompt_store.set(&prompt).await?;
    Ok(Json(MessageResponse {
        message: "System prompt updated successfully".to_string(),
    }))
}

/// GET /api/provider
pub async fn handle_get_provider(State(state): State<AppState>) -> Json<ProviderResponse> {
    Json(ProviderResponse {
        provider: state.orchestrator.provider(),
    })
}

/// POST /api/provider
pub async fn handle_set_provider(
    State(state): State<AppState>,
    Json(request): Json<SetProviderRequest>,
) -> Result<Json<ProviderResponse>, AppError> {
    let provider = state.orchestrator.set_provider(&request.provider)?;
    Ok(Json(ProviderResponse { provider }))
}
