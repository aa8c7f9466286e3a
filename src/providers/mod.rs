//! HTTP clients for the upstream enrichment providers

pub mod fullenrich;
pub mod pdl;

pub use fullenrich::{BulkContact, BulkEnrichResult, FullEnrichClient};
pub use pdl::{LookupOrigin, LookupResult, PdlClient};

use crate::error::{AppError, Result};
use reqwest::Client;
use std::time::Duration;

/// HTTP client with the per-call timeout every upstream call is bounded by
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}
