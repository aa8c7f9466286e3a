use crate::models::{CompanyInfo, ExtractedIntent, InputKind, PersonInfo, RawRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of the direct (email/domain) enrichment endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub success: bool,
    pub input_data: String,
    pub person: Option<PersonInfo>,
    pub company: Option<CompanyInfo>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Payload of an AI-mode enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnrichmentPayload {
    /// Natural-language query fanned out to the search sources
    Search {
        query: String,
        extracted_data: ExtractedIntent,
        results: Vec<RawRecord>,
        total_results: usize,
        sources_used: Vec<String>,
    },

    /// Email or domain answered by the lookup provider
    Direct {
        input: String,
        person: Option<PersonInfo>,
        company: Option<CompanyInfo>,
        message: String,
    },
}

impl EnrichmentPayload {
    /// Merged search results; empty for direct lookups
    pub fn results(&self) -> &[RawRecord] {
        match self {
            EnrichmentPayload::Search { results, .. } => results,
            EnrichmentPayload::Direct { .. } => &[],
        }
    }
}

/// Response of the AI-mode enrichment endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiEnrichmentResponse {
    pub success: bool,
    pub data: Option<EnrichmentPayload>,
    pub error: Option<String>,
    pub input_type: Option<InputKind>,
    pub extracted_data: Option<ExtractedIntent>,
    /// Sources that contributed at least one record
    #[serde(default)]
    pub sources: Vec<String>,
    /// Seconds spent processing
    pub processing_time: f64,
}

impl AiEnrichmentResponse {
    /// Failed outcome carrying the error text
    pub fn failure(error: impl Into<String>, processing_time: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            input_type: None,
            extracted_data: None,
            sources: Vec::new(),
            processing_time,
        }
    }
}

/// Result of validating a candidate email or domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub input_data: String,
    pub is_email: bool,
    pub is_domain: bool,
    pub is_valid: bool,
    #[serde(rename = "type")]
    pub kind: String,
}
