use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::*;
use crate::webhooks::WebhookReceipt;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Service info
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Lead enrichment API is running".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub message: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pdl_configured: state
            .service
            .registry()
            .is_enabled(crate::enrichment::registry::PDL),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pdl_configured: bool,
}

/// Enrich an email address or domain
pub async fn enrich(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichmentResponse>> {
    request.validate()?;
    let response = state.service.enrich_direct(&request.input_data).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnrichRequest {
    #[validate(length(max = 320))]
    pub input_data: String,
}

/// Report whether a string is a usable email or domain
pub async fn validate_input(
    State(state): State<AppState>,
    Path(input): Path<String>,
) -> Json<ValidationResult> {
    Json(state.service.validate(&input))
}

/// AI-mode enrichment of any input
pub async fn ai_enrich(
    State(state): State<AppState>,
    Json(request): Json<AiEnrichRequest>,
) -> Result<Json<AiEnrichmentResponse>> {
    request.validate()?;

    if request.input.trim().is_empty() {
        return Err(AppError::Validation("Input data cannot be empty".to_string()));
    }

    if request.use_ai_agent && !state.service.ai_enabled() {
        return Err(AppError::Validation(
            "AI Agent mode requires OPENAI_API_KEY to be set in environment variables".to_string(),
        ));
    }

    let response = state
        .service
        .process(&request.input, request.use_ai_agent)
        .await;
    Ok(Json(response))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AiEnrichRequest {
    #[validate(length(max = 2000))]
    pub input: String,
    #[serde(default = "default_use_ai_agent")]
    pub use_ai_agent: bool,
}

fn default_use_ai_agent() -> bool {
    true
}

/// AI-mode availability and enabled sources
pub async fn ai_health(State(state): State<AppState>) -> Json<AiHealthResponse> {
    let ai_agent_enabled = state.service.ai_enabled();
    let message = if ai_agent_enabled {
        "AI Agent service is running"
    } else {
        "AI Agent service is running without a language model; set OPENAI_API_KEY to enable AI mode"
    };

    Json(AiHealthResponse {
        status: "healthy".to_string(),
        message: message.to_string(),
        ai_agent_enabled,
        available_sources: state.service.registry().enabled_names(),
    })
}

#[derive(Debug, Serialize)]
pub struct AiHealthResponse {
    pub status: String,
    pub message: String,
    pub ai_agent_enabled: bool,
    pub available_sources: Vec<String>,
}

/// List history, newest first
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryListResponse> {
    let items = state.history.list(query.limit);
    Json(HistoryListResponse {
        total_count: items.len(),
        items,
    })
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub items: Vec<HistoryEntry>,
    pub total_count: usize,
}

/// Get one history entry
pub async fn get_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>> {
    state
        .history
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("History item not found".to_string()))
}

/// Clear all history
pub async fn clear_history(State(state): State<AppState>) -> Json<MessageResponse> {
    state.history.clear();
    Json(MessageResponse {
        message: "History cleared successfully".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Case-insensitive search over history inputs
pub async fn search_history(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Json<HistorySearchResponse> {
    let results = state.history.search(&query);
    Json(HistorySearchResponse {
        count: results.len(),
        query,
        results,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistorySearchResponse {
    pub query: String,
    pub results: Vec<HistoryEntry>,
    pub count: usize,
}

/// History size and capacity
pub async fn history_stats(State(state): State<AppState>) -> Json<HistoryStatsResponse> {
    Json(HistoryStatsResponse {
        total_items: state.history.count(),
        max_history_size: state.history.capacity(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryStatsResponse {
    pub total_items: usize,
    pub max_history_size: usize,
}

/// Store a FullEnrich bulk callback
pub async fn receive_fullenrich_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<WebhookAck>> {
    let receipt = WebhookReceipt::from_payload(payload)?;
    let ack = WebhookAck {
        received: true,
        enrichment_id: receipt.enrichment_id.clone(),
        contacts: receipt.contacts.len(),
    };
    state.webhooks.record(receipt);
    Ok(Json(ack))
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub enrichment_id: String,
    pub contacts: usize,
}

/// Fetch a stored FullEnrich callback
pub async fn get_fullenrich_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WebhookReceipt>> {
    state
        .webhooks
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No webhook receipt for {}", id)))
}
