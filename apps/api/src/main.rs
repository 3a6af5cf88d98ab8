mod config;
mod errors;
mod llm_client;
mod outreach;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, VendorConfig};
use crate::llm_client::gemini::GeminiVendor;
use crate::llm_client::openai::OpenAiVendor;
use crate::llm_client::{build_http_client, LlmVendor};
use crate::outreach::adapter::{OutreachGenerator, ProviderAdapter, StageModels};
use crate::outreach::orchestrator::{Adapters, Orchestrator, RuntimeSettings};
use crate::outreach::prompt_store::{FilePromptStore, PromptStore};
use crate::outreach::record::{JsonlFileSink, OutreachLog, OutreachSink, TracingSink};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    let file_store = FilePromptStore::new(&config.system_prompt_path);
    info!("Drafting instruction file: {}", file_store.path().display());
    let prompt_store: Arc<dyn PromptStore> = Arc::new(file_store);

    // One HTTP client shared by both vendors
    let http = build_http_client()?;
    let openai = OpenAiVendor::new(
        http.clone(),
        config.openai.api_key.clone(),
        &config.openai.base_url,
    );
    let gemini = GeminiVendor::new(
        http,
        config.gemini.api_key.clone(),
        &config.gemini.base_url,
    );

    let adapters = Adapters {
        openai: build_adapter(Arc::new(openai), &config.openai, &prompt_store),
        gemini: build_adapter(Arc::new(gemini), &config.gemini, &prompt_store),
    };
    let settings = Arc::new(RuntimeSettings::new(config.default_provider));
    let orchestrator = Arc::new(Orchestrator::new(adapters, settings));
    info!("LLM provider: {}", orchestrator.provider());

    let mut sinks: Vec<Arc<dyn OutreachSink>> = vec![Arc::new(TracingSink)];
    if let Some(path) = &config.outreach_log_path {
        info!("Appending outreach records to {path}");
        sinks.push(Arc::new(JsonlFileSink::new(path)));
    }

    let state = AppState {
        config: config.clone(),
        orchestrator,
        prompt_store,
        outreach_log: OutreachLog::new(sinks),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_adapter(
    vendor: Arc<dyn LlmVendor>,
    vendor_config: &VendorConfig,
    prompt_store: &Arc<dyn PromptStore>,
) -> Arc<dyn OutreachGenerator> {
    if vendor_config.api_key.is_none() {
        tracing::warn!(
            "{} API key is not set; calls to it will fail until configured",
            vendor.name()
        );
    }
    Arc::new(ProviderAdapter::new(
        vendor,
        StageModels {
            screening: vendor_config.screening_model.clone(),
            drafting: vendor_config.drafting_model.clone(),
        },
        prompt_store.clone(),
    ))
}
