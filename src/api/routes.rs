use crate::api::{handlers, AppState};
use crate::config::ServerConfig;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::warn;

/// Build the main API router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        // Service info and health
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Direct enrichment
        .route("/api/enrich", post(handlers::enrich))
        .route("/api/enrich/validate/:input", get(handlers::validate_input))
        // AI-mode enrichment
        .route("/api/ai/enrich", post(handlers::ai_enrich))
        .route("/api/ai/health", get(handlers::ai_health))
        // History
        .route(
            "/api/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route("/api/history/stats", get(handlers::history_stats))
        .route("/api/history/search/:query", get(handlers::search_history))
        .route("/api/history/:id", get(handlers::get_history_item))
        // Bulk enrichment callbacks
        .route("/api/webhooks/fullenrich", post(handlers::receive_fullenrich_webhook))
        .route(
            "/api/webhooks/fullenrich/:id",
            get(handlers::get_fullenrich_receipt),
        )
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(cors_layer(&server.cors_origins))
}

/// CORS for the configured origins; permissive when none parse
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
