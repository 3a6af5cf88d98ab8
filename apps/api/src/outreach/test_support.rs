//! Scripted vendor and in-memory prompt store for pipeline tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::json;

use crate::errors::AppError;
use crate::llm_client::{CompletionRequest, LlmError, LlmVendor, ResponseFormat};
use crate::outreach::prompt_store::{validate_prompt, PromptStore};
use crate::outreach::prompts::DEFAULT_DRAFTING_INSTRUCTION;

/// Replays queued responses in order and records every request it receives.
pub struct MockVendor {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockVendor {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Drafting is the only stage that asks for plain text.
    pub fn drafting_calls(&self) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.format == ResponseFormat::Text)
            .count()
    }
}

#[async_trait]
impl LlmVendor for MockVendor {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn screening_json(score: f64, reason: &str, learnings: &[&str]) -> String {
    json!({
        "icpScore": score,
        "icpReason": reason,
        "icpLearning": learnings,
    })
    .to_string()
}

/// Process-local prompt store.
#[derive(Default)]
pub struct InMemoryPromptStore {
    text: RwLock<Option<String>>,
}

impl InMemoryPromptStore {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: RwLock::new(Some(text.to_string())),
        }
    }
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn get(&self) -> String {
        self.text
            .read()
            .clone()
            .unwrap_or_else(|| DEFAULT_DRAFTING_INSTRUCTION.to_string())
    }

    async fn set(&self, text: &str) -> Result<(), AppError> {
        validate_prompt(text)?;
        *self.text.write() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_rejects_empty() {
        let store = InMemoryPromptStore::default();
        assert_eq!(store.get().await, DEFAULT_DRAFTING_INSTRUCTION);
        assert!(store.set("").await.is_err());
        assert_eq!(store.get().await, DEFAULT_DRAFTING_INSTRUCTION);
        store.set("Custom").await.unwrap();
        assert_eq!(store.get().await, "Custom");
    }
}
