use std::sync::Arc;

use crate::config::Config;
use crate::outreach::orchestrator::Orchestrator;
use crate::outreach::prompt_store::PromptStore;
use crate::outreach::record::OutreachLog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Provider selection and dispatch to the per-vendor adapters.
    pub orchestrator: Arc<Orchestrator>,
    /// Same store the adapters read the drafting instruction from.
    pub prompt_store: Arc<dyn PromptStore>,
    pub outreach_log: OutreachLog,
}
