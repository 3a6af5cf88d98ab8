//! Provider Adapter: runs the two-stage screening/drafting protocol against one vendor.
//!
//! Flow: derive firstName → serialize profile → screen (JSON) → gate on score > 5
//!       → draft (plain text, instruction read fresh) → GenerationResult.
//!
//! Nothing is retried. A drafting failure fails the whole call; the screening
//! result is not returned on its own.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, CompletionRequest, LlmVendor, ResponseFormat};
use crate::outreach::models::{GenerationResult, RawScreening, ScreeningResult};
use crate::outreach::profile::Profile;
use crate::outreach::prompt_store::PromptStore;
use crate::outreach::prompts::{
    build_drafting_prompt, build_screening_prompt, screening_schema, SCREENING_SYSTEM,
};

/// Anything that can turn a profile into a `GenerationResult`.
/// The orchestrator only sees this trait.
#[async_trait]
pub trait OutreachGenerator: Send + Sync {
    async fn generate(
        &self,
        profile: Profile,
        thesis: &str,
        icp_description: &str,
    ) -> Result<GenerationResult, AppError>;
}

#[derive(Debug, Clone)]
pub struct StageModels {
    pub screening: String,
    pub drafting: String,
}

pub struct ProviderAdapter {
    vendor: Arc<dyn LlmVendor>,
    models: StageModels,
    prompt_store: Arc<dyn PromptStore>,
}

impl ProviderAdapter {
    pub fn new(
        vendor: Arc<dyn LlmVendor>,
        models: StageModels,
        prompt_store: Arc<dyn PromptStore>,
    ) -> Self {
        Self {
            vendor,
            models,
            prompt_store,
        }
    }

    /// Stage 1: fit score, reason and learnings only.
    async fn screen(
        &self,
        profile_json: &str,
        thesis: &str,
        icp_description: &str,
    ) -> Result<ScreeningResult, AppError> {
        let request = CompletionRequest {
            model: self.models.screening.clone(),
            system: SCREENING_SYSTEM.to_string(),
            prompt: build_screening_prompt(icp_description, thesis, profile_json),
            format: ResponseFormat::Json {
                name: "icp_screening",
                schema: screening_schema(),
            },
        };

        let text = self
            .vendor
            .complete(&request)
            .await
            .map_err(|e| AppError::from_llm("Screening", e))?;

        let raw: RawScreening = serde_json::from_str(strip_json_fences(&text)).map_err(|e| {
            debug!("Unparseable screening output: {text}");
            AppError::GenerationFailed(format!("Screening returned invalid JSON: {e}"))
        })?;

        ScreeningResult::try_from(raw)
    }

    /// Stage 2: the message body, trimmed and otherwise untouched.
    async fn draft(&self, profile_json: &str) -> Result<String, AppError> {
        let instruction = self.prompt_store.get().await;

        let request = CompletionRequest {
            model: self.models.drafting.clone(),
            system: instruction,
            prompt: build_drafting_prompt(profile_json),
            format: ResponseFormat::Text,
        };

        let text = self
            .vendor
            .complete(&request)
            .await
            .map_err(|e| AppError::from_llm("Drafting", e))?;

        let message = text.trim();
        if message.is_empty() {
            return Err(AppError::GenerationFailed(
                "Drafting returned an empty message".to_string(),
            ));
        }
        Ok(message.to_string())
    }
}

#[async_trait]
impl OutreachGenerator for ProviderAdapter {
    async fn generate(
        &self,
        profile: Profile,
        thesis: &str,
        icp_description: &str,
    ) -> Result<GenerationResult, AppError> {
        profile.validate()?;
        let profile = profile.with_derived_first_name();
        let profile_json = profile.to_prompt_json()?;
        let vendor = self.vendor.name();

        info!(
            "[{vendor}] Screening profile {} using {}",
            profile.name, self.models.screening
        );
        let started = Instant::now();
        let screening = self.screen(&profile_json, thesis, icp_description).await?;
        info!(
            "[{vendor}] Screening completed in {}ms: icpScore={}",
            started.elapsed().as_millis(),
            screening.icp_score
        );

        if !screening.icp_score.is_good_fit() {
            info!(
                "[{vendor}] Score {} is not above the drafting threshold, skipping message",
                screening.icp_score
            );
            return Ok(GenerationResult::screened_out(screening));
        }

        let started = Instant::now();
        let message = self.draft(&profile_json).await?;
        info!(
            "[{vendor}] Drafting completed in {}ms using {} ({} chars)",
            started.elapsed().as_millis(),
            self.models.drafting,
            message.chars().count()
        );

        Ok(GenerationResult::with_message(screening, Some(message)))
    }
}
