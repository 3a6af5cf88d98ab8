//! Prompt Store: the operator-editable drafting instruction.
//!
//! Read on every drafting call, never cached. Falls back to
//! `DEFAULT_DRAFTING_INSTRUCTION` when nothing is stored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::outreach::prompts::DEFAULT_DRAFTING_INSTRUCTION;

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Current instruction text, or the built-in default.
    async fn get(&self) -> String;

    /// Replaces the instruction text. Empty text is rejected and nothing changes.
    async fn set(&self, text: &str) -> Result<(), AppError>;
}

pub(crate) fn validate_prompt(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "prompt cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Stores the instruction in a plain text file.
///
/// Writers share one temp file, so `write_lock` is held from the temp write
/// through the rename.
pub struct FilePromptStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePromptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PromptStore for FilePromptStore {
    async fn get(&self) -> String {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => DEFAULT_DRAFTING_INSTRUCTION.to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                DEFAULT_DRAFTING_INSTRUCTION.to_string()
            }
            Err(e) => {
                warn!(
                    "Could not read {}, falling back to default prompt: {e}",
                    self.path.display()
                );
                DEFAULT_DRAFTING_INSTRUCTION.to_string()
            }
        }
    }

    async fn set(&self, text: &str) -> Result<(), AppError> {
        validate_prompt(text)?;
        let _guard = self.write_lock.lock().await;

        // Write-then-rename so a concurrent reader never sees a half-written file.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, text).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to write {}: {e}",
                tmp.display()
            ))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })?;

        info!("System prompt updated ({} chars)", text.chars().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_file_store_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePromptStore::new(dir.path().join("system_prompt.txt"));
        assert_eq!(store.get().await, DEFAULT_DRAFTING_INSTRUCTION);
    }

    #[tokio::test]
    async fn test_file_store_set_is_visible_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePromptStore::new(dir.path().join("system_prompt.txt"));
        store.set("Be brief.").await.unwrap();
        assert_eq!(store.get().await, "Be brief.");
        assert!(!dir.path().join("system_prompt.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_rejects_empty_and_keeps_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePromptStore::new(dir.path().join("system_prompt.txt"));
        store.set("Original").await.unwrap();

        let err = store.set("").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = store.set("   \n").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        assert_eq!(store.get().await, "Original");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_sets_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FilePromptStore::new(dir.path().join("system_prompt.txt")));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.set(&format!("Prompt {i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.get().await;
        assert!((0..16).any(|i| stored == format!("Prompt {i}")));
        assert!(!dir.path().join("system_prompt.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_blank_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_prompt.txt");
        std::fs::write(&path, "\n").unwrap();
        let store = FilePromptStore::new(path);
        assert_eq!(store.get().await, DEFAULT_DRAFTING_INSTRUCTION);
    }
}
