//! Common test utilities for enrichment integration tests
//!
//! Builds services wired to local mock servers and provides scripted
//! language models.

#![allow(dead_code)]

use async_trait::async_trait;
use lead_enrichment_router::config::{Config, ProviderConfig};
use lead_enrichment_router::enrichment::{EnrichmentService, SourceRegistry};
use lead_enrichment_router::error::{AppError, Result};
use lead_enrichment_router::extraction::LanguageModel;
use lead_enrichment_router::history::HistoryLedger;
use std::sync::Arc;

const NO_ENV: &str = "LER_TEST_NO_SUCH_VARIABLE";

fn offline(provider: &mut ProviderConfig) {
    provider.api_key_env = NO_ENV.to_string();
    provider.api_key = None;
}

/// Configuration with every credential removed
pub fn offline_config() -> Config {
    let mut config = Config::default();
    offline(&mut config.providers.pdl);
    offline(&mut config.providers.fullenrich);
    offline(&mut config.providers.freckle);
    offline(&mut config.providers.telescope);
    config.llm.api_key_env = NO_ENV.to_string();
    config.enrichment.adapter_timeout_secs = 5;
    config
}

/// Point PDL at a mock server with a test key
pub fn with_pdl(mut config: Config, base_url: &str) -> Config {
    config.providers.pdl.base_url = base_url.to_string();
    config.providers.pdl.api_key = Some("pdl-key".to_string());
    config
}

/// Point FullEnrich at a mock server with a test key
pub fn with_fullenrich(mut config: Config, base_url: &str) -> Config {
    config.providers.fullenrich.base_url = base_url.to_string();
    config.providers.fullenrich.bulk_url = Some(format!("{}/contact/enrich/bulk", base_url));
    config.providers.fullenrich.api_key = Some("fe-key".to_string());
    config
}

pub fn build_service(config: &Config, model: Option<Arc<dyn LanguageModel>>) -> EnrichmentService {
    let registry = Arc::new(SourceRegistry::load(&config.providers));
    let history = Arc::new(HistoryLedger::new(config.history.capacity));
    EnrichmentService::new(config, registry, history, model).expect("service builds")
}

/// Language model that always answers with the same text
pub struct ScriptedModel {
    reply: String,
}

impl ScriptedModel {
    pub fn replying(reply: impl Into<String>) -> Arc<dyn LanguageModel> {
        Arc::new(Self {
            reply: reply.into(),
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Language model whose every call fails
pub struct FailingModel;

impl FailingModel {
    pub fn new() -> Arc<dyn LanguageModel> {
        Arc::new(Self)
    }
}

#[async_trait]
impl LanguageModel for FailingModel {
    fn model_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Err(AppError::integration("llm", "service unavailable"))
    }
}
