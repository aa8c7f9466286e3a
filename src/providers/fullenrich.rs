use crate::enrichment::registry::SourceDescriptor;
use crate::error::{AppError, Result};
use crate::models::RawRecord;
use crate::providers::build_http_client;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Field set requested for every contact
pub const EMAIL_FIELDS: &str = "contact.emails";

/// One contact in a bulk enrichment request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkContact {
    pub firstname: String,
    pub lastname: String,
    pub domain: String,
    pub company_name: String,
    pub enrich_fields: Vec<String>,
}

/// Parsed bulk enrichment response
#[derive(Debug, Clone, Default)]
pub struct BulkEnrichResult {
    /// Upstream job id when results are delivered asynchronously
    pub enrichment_id: Option<String>,
    pub contacts: Vec<RawRecord>,
}

/// FullEnrich bulk contact client
#[derive(Clone)]
pub struct FullEnrichClient {
    client: Client,
    bulk_url: String,
    api_key: Option<String>,
    webhook_url: Option<String>,
}

impl FullEnrichClient {
    pub fn new(source: &SourceDescriptor) -> Result<Self> {
        let bulk_url = source
            .settings
            .bulk_url
            .clone()
            .unwrap_or_else(|| format!("{}/contact/enrich/bulk", source.base_url));

        Ok(Self {
            client: build_http_client(source.settings.timeout_secs)?,
            bulk_url,
            api_key: source.api_key.clone(),
            webhook_url: source.settings.webhook_url.clone(),
        })
    }

    /// Submit a named bulk job and return whatever contacts come back inline
    pub async fn enrich_bulk(&self, name: &str, contacts: Vec<BulkContact>) -> Result<BulkEnrichResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("FullEnrich API key not set".to_string()))?;

        let mut body = json!({
            "name": name,
            "datas": contacts,
        });
        if let Some(webhook_url) = &self.webhook_url {
            body["webhook_url"] = Value::String(webhook_url.clone());
        }

        debug!(url = %self.bulk_url, contacts = contacts_len(&body), "Submitting FullEnrich bulk job");

        let response = self
            .client
            .post(&self.bulk_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::integration(
                "fullenrich",
                format!("bulk enrichment returned {}: {}", status, text),
            ));
        }

        let payload = response.json::<Value>().await?;
        Ok(BulkEnrichResult {
            enrichment_id: payload
                .get("enrichment_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            contacts: RawRecord::list_from_value(payload.get("contacts")),
        })
    }
}

fn contacts_len(body: &Value) -> usize {
    body.get("datas").and_then(Value::as_array).map_or(0, Vec::len)
}
