use crate::config::EnrichmentSettings;
use crate::enrichment::sources::SourceAdapter;
use crate::models::{ExtractedIntent, RawRecord};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Records one source produced for one intent
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: String,
    pub display_name: String,
    pub reports_contribution: bool,
    pub records: Vec<RawRecord>,
}

/// Fans an intent out to every registered source.
///
/// Batches come back in registration order, which is provider priority
/// order, whether the sources ran concurrently or one after another.
pub struct SourcePipeline {
    sources: Vec<Arc<dyn SourceAdapter>>,
    timeout: Duration,
    parallel: bool,
}

impl SourcePipeline {
    pub fn new(settings: &EnrichmentSettings) -> Self {
        Self {
            sources: Vec::new(),
            timeout: Duration::from_secs(settings.adapter_timeout_secs),
            parallel: settings.parallel_fanout,
        }
    }

    /// Register a source; registration order is priority order
    pub fn register_source(&mut self, source: Arc<dyn SourceAdapter>) {
        debug!("Registered source: {}", source.name());
        self.sources.push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub async fn run(&self, intent: &ExtractedIntent) -> Vec<SourceBatch> {
        let start = Instant::now();

        let batches = if self.parallel {
            join_all(
                self.sources
                    .iter()
                    .map(|source| run_source(source, intent, self.timeout)),
            )
            .await
        } else {
            let mut batches = Vec::with_capacity(self.sources.len());
            for source in &self.sources {
                batches.push(run_source(source, intent, self.timeout).await);
            }
            batches
        };

        info!(
            "Source fan-out completed in {}ms ({} records from {} sources)",
            start.elapsed().as_millis(),
            batches.iter().map(|b| b.records.len()).sum::<usize>(),
            batches.len()
        );

        batches
    }
}

async fn run_source(
    source: &Arc<dyn SourceAdapter>,
    intent: &ExtractedIntent,
    limit: Duration,
) -> SourceBatch {
    let records = match timeout(limit, source.fetch(intent)).await {
        Ok(records) => records,
        Err(_) => {
            warn!("Source {} timed out after {}s", source.name(), limit.as_secs());
            Vec::new()
        }
    };

    SourceBatch {
        source: source.name().to_string(),
        display_name: source.display_name().to_string(),
        reports_contribution: source.reports_contribution(),
        records,
    }
}

/// Display names of reporting sources that produced at least one record
pub fn contributing_sources(batches: &[SourceBatch]) -> Vec<String> {
    batches
        .iter()
        .filter(|b| b.reports_contribution && !b.records.is_empty())
        .map(|b| b.display_name.clone())
        .collect()
}
