/// LLM Client: the single point of entry for all vendor API calls.
///
/// ARCHITECTURAL RULE: No other module may call a vendor API directly.
/// Every vendor is wrapped behind `LlmVendor`, so the outreach pipeline never
/// knows which one it is talking to.
///
/// No retries happen here. A failed call is reported once and the caller decides.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub mod gemini;
pub mod openai;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("{0} API key is not set")]
    MissingCredential(&'static str),
}

/// How the vendor should shape its answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free text, returned as-is.
    Text,
    /// JSON constrained by a JSON Schema. `name` identifies the schema to vendors
    /// that require one.
    Json { name: &'static str, schema: Value },
}

/// One vendor call: a system instruction plus a single user turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub format: ResponseFormat,
}

/// A text-generation backend. One implementation per vendor.
#[async_trait]
pub trait LlmVendor: Send + Sync {
    /// Human-readable vendor name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Sends the request and returns the raw text of the first candidate.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Builds the HTTP client shared by all vendors.
pub fn build_http_client() -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Reads a non-success response body and pulls out the vendor's error message.
/// Both OpenAI and Gemini wrap errors as `{"error": {"message": "..."}}`.
pub(crate) async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
