use crate::enrichment::registry::{SourceRegistry, FULLENRICH, PDL};
use crate::error::{AppError, Result};
use crate::models::{ExtractedIntent, RawRecord};
use crate::providers::fullenrich::EMAIL_FIELDS;
use crate::providers::{BulkContact, FullEnrichClient, PdlClient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const UNKNOWN: &str = "Unknown";
const PLACEHOLDER_DOMAIN: &str = "unknown.com";

/// One upstream source of contact records
#[async_trait]
pub trait SourceAdapter: Send + Sync + 'static {
    /// Registry key
    fn name(&self) -> &str;

    /// Name reported in `sources_used`
    fn display_name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    /// Whether records from this adapter add its display name to `sources_used`
    fn reports_contribution(&self) -> bool {
        true
    }

    /// Provider call; errors are absorbed by [`SourceAdapter::fetch`]
    async fn search(&self, intent: &ExtractedIntent) -> Result<Vec<RawRecord>>;

    /// Fetch records for an intent. Never fails: a disabled source or any
    /// provider error yields an empty list.
    async fn fetch(&self, intent: &ExtractedIntent) -> Vec<RawRecord> {
        if !self.is_enabled() {
            debug!(source = self.name(), "Source disabled, skipping");
            return Vec::new();
        }

        match self.search(intent).await {
            Ok(records) => {
                debug!(source = self.name(), count = records.len(), "Source returned records");
                records
            }
            Err(e) => {
                warn!(source = self.name(), error = %e, "Source search failed");
                Vec::new()
            }
        }
    }
}

/// People Data Labs person search
pub struct PdlSearchSource {
    client: Arc<PdlClient>,
    max_results: usize,
}

impl PdlSearchSource {
    pub fn new(client: Arc<PdlClient>, max_results: usize) -> Self {
        Self { client, max_results }
    }
}

#[async_trait]
impl SourceAdapter for PdlSearchSource {
    fn name(&self) -> &str {
        PDL
    }

    fn display_name(&self) -> &str {
        "People Data Labs"
    }

    fn is_enabled(&self) -> bool {
        self.client.is_live()
    }

    async fn search(&self, intent: &ExtractedIntent) -> Result<Vec<RawRecord>> {
        self.client.search_people(intent, self.max_results).await
    }
}

/// FullEnrich bulk contact enrichment
pub struct FullEnrichSource {
    client: Option<Arc<FullEnrichClient>>,
}

impl FullEnrichSource {
    /// `client` is `None` when the source has no credential
    pub fn new(client: Option<Arc<FullEnrichClient>>) -> Self {
        Self { client }
    }
}

/// Bulk request contact for an intent.
///
/// Intents carry no person name or employer, so placeholders are used; the
/// domain is the first keyword that looks like one.
pub fn bulk_contact_for(intent: &ExtractedIntent) -> BulkContact {
    let domain = match intent.keywords.iter().find(|k| k.contains('.')) {
        Some(keyword) => keyword.clone(),
        None => {
            warn!("No domain in intent keywords, using placeholder domain");
            PLACEHOLDER_DOMAIN.to_string()
        }
    };

    BulkContact {
        firstname: UNKNOWN.to_string(),
        lastname: UNKNOWN.to_string(),
        domain,
        company_name: UNKNOWN.to_string(),
        enrich_fields: vec![EMAIL_FIELDS.to_string()],
    }
}

#[async_trait]
impl SourceAdapter for FullEnrichSource {
    fn name(&self) -> &str {
        FULLENRICH
    }

    fn display_name(&self) -> &str {
        "FullEnrich"
    }

    fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn search(&self, intent: &ExtractedIntent) -> Result<Vec<RawRecord>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::Configuration("FullEnrich API key not set".to_string()))?;

        let contact = bulk_contact_for(intent);
        let job_name = format!(
            "{} {} at {}",
            contact.firstname, contact.lastname, contact.company_name
        );

        let result = client.enrich_bulk(&job_name, vec![contact]).await?;
        if let Some(id) = &result.enrichment_id {
            info!(enrichment_id = %id, "FullEnrich bulk job accepted");
        }

        Ok(result.contacts)
    }
}

/// Registry keys with their own pipeline slot
const FIRST_CLASS_SOURCES: &[&str] = &[PDL, FULLENRICH];

fn is_first_class(key: &str) -> bool {
    FIRST_CLASS_SOURCES.contains(&key)
}

/// Every registered source without its own pipeline slot, queried one
/// after another.
///
/// Sources without a registered adapter are skipped. A failing source is
/// logged and never blocks the rest.
pub struct RemainingSources {
    registry: Arc<SourceRegistry>,
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl RemainingSources {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self {
            registry,
            adapters: HashMap::new(),
        }
    }

    /// Register the adapter serving a registry key
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        debug!(source = adapter.name(), "Registered remaining-source adapter");
        self.adapters.insert(adapter.name().to_string(), adapter);
    }
}

#[async_trait]
impl SourceAdapter for RemainingSources {
    fn name(&self) -> &str {
        "remaining"
    }

    fn display_name(&self) -> &str {
        "Other sources"
    }

    fn is_enabled(&self) -> bool {
        self.registry
            .iter()
            .any(|s| !is_first_class(&s.key) && s.enabled)
    }

    fn reports_contribution(&self) -> bool {
        false
    }

    async fn search(&self, intent: &ExtractedIntent) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for source in self.registry.iter().filter(|s| !is_first_class(&s.key)) {
            if !source.enabled {
                continue;
            }

            let Some(adapter) = self.adapters.get(&source.key) else {
                debug!(source = %source.key, "No adapter for source, skipping");
                continue;
            };

            records.extend(adapter.fetch(intent).await);
        }

        Ok(records)
    }
}
