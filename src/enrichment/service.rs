use crate::config::Config;
use crate::enrichment::classifier::{self, classify};
use crate::enrichment::merge::merge_results;
use crate::enrichment::normalize::{company_from_person, normalize_person};
use crate::enrichment::pipeline::{contributing_sources, SourcePipeline};
use crate::enrichment::registry::{SourceRegistry, FULLENRICH, PDL};
use crate::enrichment::sources::{FullEnrichSource, PdlSearchSource, RemainingSources, SourceAdapter};
use crate::error::{AppError, Result};
use crate::extraction::{IntentExtractor, LanguageModel};
use crate::history::HistoryLedger;
use crate::models::{
    AiEnrichmentResponse, CompanyInfo, EnrichmentPayload, EnrichmentResponse, HistoryEntry,
    InputKind, PersonInfo, ValidationResult,
};
use crate::providers::{FullEnrichClient, LookupResult, PdlClient};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

const EMAIL_LOOKUP_MESSAGE: &str = "Email data enriched successfully using People Data Lab";
const DOMAIN_LOOKUP_MESSAGE: &str = "Domain data enriched successfully using People Data Lab";
const NO_LOOKUP_MESSAGE: &str =
    "Input is neither an email nor a domain; enable AI mode to search by description";

/// Routes enrichment requests to the direct lookup or the AI search path
pub struct EnrichmentService {
    registry: Arc<SourceRegistry>,
    lookup: Arc<PdlClient>,
    extractor: IntentExtractor,
    pipeline: SourcePipeline,
    history: Arc<HistoryLedger>,
    max_merged_results: usize,
}

impl EnrichmentService {
    /// Wire the default providers from configuration
    pub fn new(
        config: &Config,
        registry: Arc<SourceRegistry>,
        history: Arc<HistoryLedger>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Result<Self> {
        let pdl = registry
            .get(PDL)
            .ok_or_else(|| AppError::Configuration("PDL source not registered".to_string()))?;
        let lookup = Arc::new(PdlClient::new(pdl)?);

        let fullenrich_client = match registry.get(FULLENRICH) {
            Some(source) if source.enabled => Some(Arc::new(FullEnrichClient::new(source)?)),
            _ => None,
        };
        let fullenrich: Arc<dyn SourceAdapter> = Arc::new(FullEnrichSource::new(fullenrich_client));

        let remaining = RemainingSources::new(Arc::clone(&registry));

        let mut pipeline = SourcePipeline::new(&config.enrichment);
        pipeline.register_source(Arc::new(PdlSearchSource::new(
            Arc::clone(&lookup),
            config.enrichment.max_results_per_source,
        )));
        pipeline.register_source(fullenrich);
        pipeline.register_source(Arc::new(remaining));

        info!(
            sources = pipeline.source_count(),
            ai_enabled = model.is_some(),
            "Enrichment service initialized"
        );

        Ok(Self::from_parts(
            registry,
            lookup,
            IntentExtractor::new(model),
            pipeline,
            history,
            config.enrichment.max_merged_results,
        ))
    }

    /// Assemble from prepared parts
    pub fn from_parts(
        registry: Arc<SourceRegistry>,
        lookup: Arc<PdlClient>,
        extractor: IntentExtractor,
        pipeline: SourcePipeline,
        history: Arc<HistoryLedger>,
        max_merged_results: usize,
    ) -> Self {
        Self {
            registry,
            lookup,
            extractor,
            pipeline,
            history,
            max_merged_results,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn history(&self) -> &Arc<HistoryLedger> {
        &self.history
    }

    /// True when natural-language extraction has a language model
    pub fn ai_enabled(&self) -> bool {
        self.extractor.is_enabled()
    }

    pub fn validate(&self, input: &str) -> ValidationResult {
        classifier::validate(input)
    }

    /// AI-mode enrichment. Never fails: errors and panics inside the
    /// pipeline become an unsuccessful response.
    #[instrument(skip(self))]
    pub async fn process(&self, input: &str, use_ai: bool) -> AiEnrichmentResponse {
        let start = Instant::now();
        let outcome = AssertUnwindSafe(self.run(input, use_ai)).catch_unwind().await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(Ok(mut response)) => {
                response.processing_time = elapsed;
                response
            }
            Ok(Err(e)) => {
                error!(error = %e, "Enrichment failed");
                AiEnrichmentResponse::failure(e.to_string(), elapsed)
            }
            Err(panic) => {
                let e = AppError::Internal(panic_message(panic.as_ref()));
                error!(error = %e, "Enrichment panicked");
                AiEnrichmentResponse::failure(e.to_string(), elapsed)
            }
        }
    }

    /// Direct email or domain enrichment
    pub async fn enrich_direct(&self, input: &str) -> Result<EnrichmentResponse> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(AppError::Validation("Input data cannot be empty".to_string()));
        }

        let (lookup, message) = if classifier::is_email(&input) {
            (self.lookup.enrich_email(&input).await, EMAIL_LOOKUP_MESSAGE)
        } else if classifier::is_domain(&input) {
            (self.lookup.enrich_domain(&input).await, DOMAIN_LOOKUP_MESSAGE)
        } else {
            return Err(AppError::Validation(
                "Invalid input. Please provide a valid email address or domain.".to_string(),
            ));
        };

        info!(input = %input, origin = ?lookup.origin, "Direct enrichment completed");

        let (person, company) = split_lookup(lookup);
        self.record(&input, person.clone(), company.clone());

        Ok(EnrichmentResponse {
            success: true,
            input_data: input,
            person,
            company,
            message: Some(message.to_string()),
            timestamp: Utc::now(),
        })
    }

    async fn run(&self, input: &str, use_ai: bool) -> Result<AiEnrichmentResponse> {
        let query = input.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Input data cannot be empty".to_string()));
        }

        let kind = classify(query);

        if !use_ai || kind.is_direct() {
            return Ok(self.direct_outcome(query, kind).await);
        }

        let intent = self.extractor.extract(query).await;
        let batches = self.pipeline.run(&intent).await;
        let sources = contributing_sources(&batches);

        let lists = batches
            .into_iter()
            .map(|b| b.records)
            .filter(|records| !records.is_empty())
            .collect();
        let results = merge_results(lists, self.max_merged_results);

        info!(
            results = results.len(),
            sources = ?sources,
            "Natural-language enrichment completed"
        );

        let (person, company) = match results.first() {
            Some(primary) => (non_empty_person(normalize_person(primary)), company_from_person(primary)),
            None => (None, None),
        };
        self.record(query, person, company);

        Ok(AiEnrichmentResponse {
            success: true,
            data: Some(EnrichmentPayload::Search {
                query: query.to_string(),
                extracted_data: intent.clone(),
                total_results: results.len(),
                results,
                sources_used: sources.clone(),
            }),
            error: None,
            input_type: Some(kind),
            extracted_data: Some(intent),
            sources,
            processing_time: 0.0,
        })
    }

    async fn direct_outcome(&self, query: &str, kind: InputKind) -> AiEnrichmentResponse {
        let (person, company, message) = match kind {
            InputKind::Email => {
                let (person, company) = split_lookup(self.lookup.enrich_email(&query.to_lowercase()).await);
                (person, company, EMAIL_LOOKUP_MESSAGE)
            }
            InputKind::Domain => {
                let (person, company) = split_lookup(self.lookup.enrich_domain(&query.to_lowercase()).await);
                (person, company, DOMAIN_LOOKUP_MESSAGE)
            }
            InputKind::NaturalLanguage => (None, None, NO_LOOKUP_MESSAGE),
        };

        self.record(query, person.clone(), company.clone());

        AiEnrichmentResponse {
            success: true,
            data: Some(EnrichmentPayload::Direct {
                input: query.to_string(),
                person,
                company,
                message: message.to_string(),
            }),
            error: None,
            input_type: Some(kind),
            extracted_data: None,
            sources: Vec::new(),
            processing_time: 0.0,
        }
    }

    fn record(&self, input: &str, person: Option<PersonInfo>, company: Option<CompanyInfo>) {
        self.history.add(HistoryEntry::new(input, person, company));
    }
}

fn split_lookup(lookup: LookupResult) -> (Option<PersonInfo>, Option<CompanyInfo>) {
    (lookup.person, lookup.company)
}

fn non_empty_person(person: PersonInfo) -> Option<PersonInfo> {
    (!person.is_empty()).then_some(person)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Enrichment pipeline panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> EnrichmentService {
        let mut config = Config::default();
        for p in [
            &mut config.providers.pdl,
            &mut config.providers.fullenrich,
            &mut config.providers.freckle,
            &mut config.providers.telescope,
        ] {
            p.api_key_env = "LER_TEST_NO_SUCH_VARIABLE".to_string();
        }

        let registry = Arc::new(SourceRegistry::load(&config.providers));
        let history = Arc::new(HistoryLedger::new(config.history.capacity));
        EnrichmentService::new(&config, registry, history, None).unwrap()
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");

        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "Enrichment pipeline panicked");
    }

    #[tokio::test]
    async fn test_enrich_direct_rejects_bad_input() {
        let service = offline_service();

        let err = service.enrich_direct("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Input data cannot be empty");

        let err = service.enrich_direct("not an email").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.history().count(), 0);
    }

    #[tokio::test]
    async fn test_enrich_direct_email_uses_mock_lookup() {
        let service = offline_service();

        let response = service.enrich_direct("  Jane.Smith@Acme.io ").await.unwrap();

        assert!(response.success);
        assert_eq!(response.input_data, "jane.smith@acme.io");
        assert_eq!(
            response.person.unwrap().full_name.as_deref(),
            Some("Jane Smith")
        );
        assert_eq!(response.message.as_deref(), Some(EMAIL_LOOKUP_MESSAGE));
        assert_eq!(service.history().count(), 1);
    }

    #[tokio::test]
    async fn test_natural_language_without_ai_mode() {
        let service = offline_service();

        let response = service.process("marketing leads in Berlin", false).await;

        assert!(response.success);
        assert_eq!(response.input_type, Some(InputKind::NaturalLanguage));
        match response.data {
            Some(EnrichmentPayload::Direct { person, company, .. }) => {
                assert!(person.is_none());
                assert!(company.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert_eq!(service.history().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_ai_input_is_failed_outcome() {
        let service = offline_service();
        let response = service.process("  ", true).await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("cannot be empty"));
        assert_eq!(service.history().count(), 0);
    }

    #[test]
    fn test_registry_is_exposed() {
        let service = offline_service();
        assert_eq!(service.registry().len(), 4);
    }
}
