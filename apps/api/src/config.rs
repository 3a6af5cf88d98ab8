use anyhow::{Context, Result};
use tracing::warn;

use crate::outreach::orchestrator::Provider;

const DEFAULT_ICP_DESCRIPTION: &str = "No ICP description provided.";

/// Per-vendor credentials and model choices.
///
/// The screening model handles the cheap fit check; the drafting model only runs
/// for profiles that pass the gate.
#[derive(Debug, Clone)]
pub struct VendorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub screening_model: String,
    pub drafting_model: String,
}

/// Application configuration loaded from environment variables.
/// Everything has a fallback except vendor API keys, whose absence is reported
/// per call as a missing credential.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_provider: Provider,
    pub openai: VendorConfig,
    pub gemini: VendorConfig,
    pub default_thesis: String,
    pub icp_description: String,
    pub system_prompt_path: String,
    pub outreach_log_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            default_provider: parse_provider(optional_env("LLM_PROVIDER")),
            openai: VendorConfig {
                api_key: optional_env("OPENAI_API_KEY"),
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                screening_model: env_or("OPENAI_SCREENING_MODEL", "gpt-4o-mini"),
                drafting_model: env_or("OPENAI_MODEL", "gpt-4o"),
            },
            gemini: VendorConfig {
                api_key: optional_env("GEMINI_API_KEY"),
                base_url: env_or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                screening_model: env_or("GEMINI_SCREENING_MODEL", "gemini-1.5-flash"),
                drafting_model: env_or("GEMINI_MODEL", "gemini-1.5-pro"),
            },
            default_thesis: env_or("DEFAULT_THESIS", ""),
            icp_description: env_or("ICP_DESCRIPTION", DEFAULT_ICP_DESCRIPTION),
            system_prompt_path: env_or("SYSTEM_PROMPT_PATH", "system_prompt.txt"),
            outreach_log_path: optional_env("OUTREACH_LOG_PATH"),
            port: env_or("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Unknown provider names fall back to the default rather than aborting startup.
fn parse_provider(raw: Option<String>) -> Provider {
    match raw {
        None => Provider::default(),
        Some(name) => name.parse().unwrap_or_else(|_| {
            warn!(
                "LLM_PROVIDER '{name}' is not recognised, falling back to {}",
                Provider::default()
            );
            Provider::default()
        }),
    }
}
