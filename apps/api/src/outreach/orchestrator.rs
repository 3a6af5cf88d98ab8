//! Generation Orchestrator: owns the provider selection and dispatches to the
//! matching adapter.
//!
//! The selection is runtime state. It starts at the configured default, can be
//! switched without a restart, and is never persisted.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::outreach::adapter::OutreachGenerator;
use crate::outreach::models::GenerationResult;
use crate::outreach::profile::Profile;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[default]
    Gemini,
}

impl Provider {
    pub const ALL: &'static [Provider] = &[Provider::OpenAi, Provider::Gemini];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|p| p.name() == normalized)
            .copied()
            .ok_or_else(|| AppError::InvalidProvider(s.to_string()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mutable settings snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: Provider,
}

/// Runtime-editable settings shared by the orchestrator and the API surface.
/// Every change goes through `update`; readers get a copy.
#[derive(Debug)]
pub struct RuntimeSettings {
    inner: RwLock<Settings>,
}

impl RuntimeSettings {
    pub fn new(provider: Provider) -> Self {
        Self {
            inner: RwLock::new(Settings { provider }),
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.inner.read().clone()
    }

    /// Applies `change` to a copy and stores it only if `change` succeeds.
    pub fn update<F>(&self, change: F) -> Result<Settings, AppError>
    where
        F: FnOnce(&mut Settings) -> Result<(), AppError>,
    {
        let mut guard = self.inner.write();
        let mut next = guard.clone();
        change(&mut next)?;
        *guard = next.clone();
        Ok(next)
    }
}

/// One generator per provider.
pub struct Adapters {
    pub openai: Arc<dyn OutreachGenerator>,
    pub gemini: Arc<dyn OutreachGenerator>,
}

impl Adapters {
    fn get(&self, provider: Provider) -> &Arc<dyn OutreachGenerator> {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Gemini => &self.gemini,
        }
    }
}

pub struct Orchestrator {
    adapters: Adapters,
    settings: Arc<RuntimeSettings>,
}

impl Orchestrator {
    pub fn new(adapters: Adapters, settings: Arc<RuntimeSettings>) -> Self {
        Self { adapters, settings }
    }

    pub fn provider(&self) -> Provider {
        self.settings.snapshot().provider
    }

    /// Switches provider. Unknown names fail and leave the selection untouched.
    pub fn set_provider(&self, name: &str) -> Result<Provider, AppError> {
        let settings = self.settings.update(|s| {
            s.provider = name.parse()?;
            Ok(())
        })?;
        info!("Switched LLM provider to: {}", settings.provider);
        Ok(settings.provider)
    }

    /// Hands the request to the adapter for the provider selected right now and
    /// reports which provider that was.
    pub async fn generate(
        &self,
        profile: Profile,
        thesis: &str,
        icp_description: &str,
    ) -> Result<(Provider, GenerationResult), AppError> {
        let provider = self.provider();
        let result = self
            .adapters
            .get(provider)
            .generate(profile, thesis, icp_description)
            .await?;
        Ok((provider, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outreach::adapter::{ProviderAdapter, StageModels};
    use crate::outreach::test_support::{screening_json, InMemoryPromptStore, MockVendor};

    fn adapter(vendor: Arc<MockVendor>) -> Arc<dyn OutreachGenerator> {
        Arc::new(ProviderAdapter::new(
            vendor,
            StageModels {
                screening: "s".to_string(),
                drafting: "d".to_string(),
            },
            Arc::new(InMemoryPromptStore::default()),
        ))
    }

    fn orchestrator(
        openai: Arc<MockVendor>,
        gemini: Arc<MockVendor>,
        default: Provider,
    ) -> Orchestrator {
        Orchestrator::new(
            Adapters {
                openai: adapter(openai),
                gemini: adapter(gemini),
            },
            Arc::new(RuntimeSettings::new(default)),
        )
    }

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" Gemini ".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Provider::OpenAi).unwrap(),
            r#""openai""#
        );
        let p: Provider = serde_json::from_str(r#""gemini""#).unwrap();
        assert_eq!(p, Provider::Gemini);
    }

    #[test]
    fn test_invalid_provider_leaves_selection_unchanged() {
        let orch = orchestrator(
            Arc::new(MockVendor::new(vec![])),
            Arc::new(MockVendor::new(vec![])),
            Provider::OpenAi,
        );
        let err = orch.set_provider("anthropic").unwrap_err();
        assert!(matches!(err, AppError::InvalidProvider(_)));
        assert_eq!(orch.provider(), Provider::OpenAi);
    }

    #[test]
    fn test_set_provider_switches() {
        let orch = orchestrator(
            Arc::new(MockVendor::new(vec![])),
            Arc::new(MockVendor::new(vec![])),
            Provider::Gemini,
        );
        assert_eq!(orch.set_provider("OPENAI").unwrap(), Provider::OpenAi);
        assert_eq!(orch.provider(), Provider::OpenAi);
    }

    #[test]
    fn test_failed_update_does_not_store_partial_change() {
        let settings = RuntimeSettings::new(Provider::Gemini);
        let result = settings.update(|s| {
            s.provider = Provider::OpenAi;
            Err(AppError::InvalidProvider("x".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(settings.snapshot().provider, Provider::Gemini);
    }

    #[tokio::test]
    async fn test_generate_dispatches_to_selected_provider() {
        let openai = Arc::new(MockVendor::new(vec![Ok(screening_json(2.0, "No", &[]))]));
        let gemini = Arc::new(MockVendor::new(vec![Ok(screening_json(1.0, "No", &[]))]));
        let orch = orchestrator(openai.clone(), gemini.clone(), Provider::Gemini);

        let (provider, result) = orch
            .generate(Profile::named("Sam Lee"), "", "")
            .await
            .unwrap();
        assert_eq!(provider, Provider::Gemini);
        assert_eq!(result.icp_score.value(), 1.0);
        assert_eq!(gemini.call_count(), 1);
        assert_eq!(openai.call_count(), 0);

        orch.set_provider("openai").unwrap();
        let (provider, result) = orch
            .generate(Profile::named("Sam Lee"), "", "")
            .await
            .unwrap();
        assert_eq!(provider, Provider::OpenAi);
        assert_eq!(result.icp_score.value(), 2.0);
        assert_eq!(openai.call_count(), 1);
        assert_eq!(gemini.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_reports_provider_selected_at_dispatch() {
        let openai = Arc::new(MockVendor::new(vec![]));
        let gemini = Arc::new(MockVendor::new(vec![Ok(screening_json(3.0, "No", &[]))]));
        let orch = orchestrator(openai.clone(), gemini.clone(), Provider::Gemini);

        let (provider, _) = orch
            .generate(Profile::named("Sam Lee"), "", "")
            .await
            .unwrap();
        orch.set_provider("openai").unwrap();

        assert_eq!(provider, Provider::Gemini);
        assert_eq!(gemini.call_count(), 1);
        assert_eq!(openai.call_count(), 0);
        assert_eq!(orch.provider(), Provider::OpenAi);
    }
}
