use lead_enrichment_router::{
    api::{build_router, AppState},
    config::Config,
    enrichment::{EnrichmentService, SourceRegistry},
    extraction::{LanguageModel, OpenAiChatModel},
    history::HistoryLedger,
};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let default_filter = format!(
        "lead_enrichment_router={},tower_http=info",
        config.observability.log_level
    );
    let (json_layer, text_layer) = if config.observability.json_logs {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Source registry and credentials are read once
    let registry = Arc::new(SourceRegistry::load(&config.providers));
    tracing::info!(
        "✅ Source registry loaded ({} sources, enabled: {:?})",
        registry.len(),
        registry.enabled_names()
    );

    let history = Arc::new(HistoryLedger::new(config.history.capacity));
    tracing::info!("✅ History ledger initialized (capacity {})", history.capacity());

    // Language model is optional; without it AI mode is refused
    let model: Option<Arc<dyn LanguageModel>> = match OpenAiChatModel::from_config(&config.llm) {
        Ok(Some(model)) => {
            tracing::info!("✅ Language model configured: {}", config.llm.model);
            Some(Arc::new(model))
        }
        Ok(None) => {
            tracing::warn!("⚠️  No language model configured, AI mode disabled");
            None
        }
        Err(e) => {
            tracing::warn!("⚠️  Language model initialization failed: {}", e);
            tracing::warn!("   Continuing without AI mode");
            None
        }
    };

    let service = Arc::new(EnrichmentService::new(
        &config,
        Arc::clone(&registry),
        history,
        model,
    )
    .context("Failed to build enrichment service")?);
    tracing::info!("✅ Enrichment service initialized");

    let state = AppState::new(service);
    let app = build_router(state, &config.server);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;

    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
