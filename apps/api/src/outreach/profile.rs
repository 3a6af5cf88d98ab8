//! Profile model as scraped from a LinkedIn page.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Field order here is the field order of the serialized profile the vendors see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl Profile {
    /// A profile with only a name, everything else absent.
    #[cfg(test)]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first_name: None,
            headline: None,
            summary: None,
            location: None,
            experience: None,
            linkedin_url: None,
        }
    }

    /// Rejects profiles that cannot be addressed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "profile.name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Fills `first_name` from the first token of `name` when it is missing or blank.
    pub fn with_derived_first_name(mut self) -> Self {
        let missing = self
            .first_name
            .as_deref()
            .map_or(true, |f| f.trim().is_empty());
        if missing {
            self.first_name = self.name.split_whitespace().next().map(str::to_string);
        }
        self
    }

    /// Pretty JSON in declaration order. This exact text goes to both stages.
    pub fn to_prompt_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))
    }
}
