mod common;

use async_trait::async_trait;
use common::{build_service, offline_config, with_fullenrich, with_pdl, FailingModel, ScriptedModel};
use lead_enrichment_router::enrichment::{
    EnrichmentService, SourceAdapter, SourcePipeline, SourceRegistry,
};
use lead_enrichment_router::error::Result;
use lead_enrichment_router::extraction::IntentExtractor;
use lead_enrichment_router::history::HistoryLedger;
use lead_enrichment_router::models::{EnrichmentPayload, ExtractedIntent, InputKind, RawRecord};
use lead_enrichment_router::providers::PdlClient;
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

const INTENT_REPLY: &str =
    "```json\n{\"target_roles\": [\"CTO\"], \"industries\": [\"fintech\"], \"region\": \"India\"}\n```";

async fn mock_pdl_search(server: &mut mockito::Server, status: usize) -> mockito::Mock {
    server
        .mock("GET", "/person/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "pdl-key".into()),
            Matcher::UrlEncoded("job_title".into(), "CTO".into()),
            Matcher::UrlEncoded("location".into(), "India".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": 200,
                "data": [
                    {"full_name": "Ravi Kumar", "job_title": "CTO", "email": "ravi@fin.in", "job_company_name": "FinCo"},
                    {"full_name": "Priya", "email": "priya@pay.in"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_fullenrich_bulk(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("POST", "/contact/enrich/bulk")
        .match_header("authorization", "Bearer fe-key")
        .match_body(Matcher::PartialJson(json!({"name": "Unknown Unknown at Unknown"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .expect(1)
        .with_body(
            json!({
                "enrichment_id": "job-1",
                "contacts": [
                    {"full_name": "Priya (FullEnrich)", "email": "priya@pay.in"},
                    {"full_name": "Li", "email": "li@bank.in"},
                    {"full_name": "No Email"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Test direct email lookup against a live PDL response
#[tokio::test]
async fn test_direct_email_lookup_live() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/person/enrich")
        .match_query(Matcher::UrlEncoded("email".into(), "ada@analytical.io".into()))
        .match_header("x-api-key", "pdl-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": 200,
                "data": {
                    "full_name": "ada lovelace",
                    "job_title": "cto",
                    "work_email": "ada@analytical.io",
                    "linkedin_url": "linkedin.com/in/ada",
                    "job_company_name": "Analytical Engines",
                    "job_company_website": "analytical.io",
                    "job_company_size": "11-50"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = build_service(&with_pdl(offline_config(), &server.url()), None);
    let response = service.enrich_direct(" Ada@Analytical.io ").await.unwrap();

    mock.assert_async().await;
    assert!(response.success);
    assert_eq!(response.input_data, "ada@analytical.io");

    let person = response.person.unwrap();
    assert_eq!(person.full_name.as_deref(), Some("ada lovelace"));
    assert_eq!(person.email.as_deref(), Some("ada@analytical.io"));
    assert_eq!(
        person.linkedin_profile.as_deref(),
        Some("https://linkedin.com/in/ada")
    );

    let company = response.company.unwrap();
    assert_eq!(company.name.as_deref(), Some("Analytical Engines"));
    assert_eq!(company.domain.as_deref(), Some("analytical.io"));
    assert_eq!(company.website.as_deref(), Some("https://analytical.io"));
    assert_eq!(company.size.as_deref(), Some("11-50"));

    let history = service.history().list(None);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].input_data, "ada@analytical.io");
}

/// Test that an upstream error falls back to mock data
#[tokio::test]
async fn test_direct_email_lookup_falls_back_to_mock() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/person/enrich")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(json!({"status": 404, "error": {"type": "not_found"}}).to_string())
        .create_async()
        .await;

    let service = build_service(&with_pdl(offline_config(), &server.url()), None);
    let response = service.enrich_direct("ada@analytical.io").await.unwrap();

    let person = response.person.unwrap();
    assert_eq!(person.full_name.as_deref(), Some("Ada Doe"));
    assert_eq!(person.company.as_deref(), Some("Example Corp"));
    assert_eq!(
        response.company.unwrap().location.as_deref(),
        Some("San Francisco, CA")
    );
}

/// Test direct domain lookup with a flat company response
#[tokio::test]
async fn test_direct_domain_lookup_live() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/company/enrich")
        .match_query(Matcher::UrlEncoded("website".into(), "globex.com".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": 200,
                "name": "globex",
                "website": "globex.com",
                "size": "1001-5000",
                "industry": "manufacturing",
                "founded": 1989,
                "location": {"name": "springfield, us"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = build_service(&with_pdl(offline_config(), &server.url()), None);
    let response = service.enrich_direct("GLOBEX.com").await.unwrap();

    assert!(response.person.is_none());
    let company = response.company.unwrap();
    assert_eq!(company.name.as_deref(), Some("globex"));
    assert_eq!(company.domain.as_deref(), Some("globex.com"));
    assert_eq!(company.website.as_deref(), Some("https://globex.com"));
    assert_eq!(company.founded, Some(1989));
    assert_eq!(company.location.as_deref(), Some("springfield, us"));
    assert_eq!(
        response.message.as_deref(),
        Some("Domain data enriched successfully using People Data Lab")
    );
}

/// Test that email input in AI mode still takes the direct path
#[tokio::test]
async fn test_ai_mode_email_uses_direct_lookup() {
    let service = build_service(&offline_config(), Some(ScriptedModel::replying(INTENT_REPLY)));

    let response = service.process("john.doe@example.com", true).await;

    assert!(response.success);
    assert_eq!(response.input_type, Some(InputKind::Email));
    assert!(response.extracted_data.is_none());
    match response.data {
        Some(EnrichmentPayload::Direct { person, .. }) => {
            assert_eq!(person.unwrap().full_name.as_deref(), Some("John Doe"));
        }
        other => panic!("expected direct payload, got {:?}", other),
    }
}

/// Test natural-language search merging PDL and FullEnrich results
#[tokio::test]
async fn test_natural_language_search_merges_sources() {
    let mut server = mockito::Server::new_async().await;
    let search = mock_pdl_search(&mut server, 200).await;
    let bulk = mock_fullenrich_bulk(&mut server).await;

    let config = with_fullenrich(with_pdl(offline_config(), &server.url()), &server.url());
    let service = build_service(&config, Some(ScriptedModel::replying(INTENT_REPLY)));

    let response = service.process("CTOs at fintech startups in India", true).await;

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.input_type, Some(InputKind::NaturalLanguage));
    assert_eq!(response.sources, vec!["People Data Labs", "FullEnrich"]);

    let intent = response.extracted_data.clone().unwrap();
    assert_eq!(intent.target_roles, vec!["CTO"]);
    assert_eq!(intent.region.as_deref(), Some("India"));

    let data = response.data.unwrap();
    let emails: Vec<_> = data.results().iter().filter_map(|r| r.email()).collect();
    assert_eq!(emails, vec!["ravi@fin.in", "priya@pay.in", "li@bank.in"]);

    // First-seen record wins on duplicate emails
    assert_eq!(data.results()[1].get("full_name"), Some(&json!("Priya")));

    let history = service.history().list(None);
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.input_data, "CTOs at fintech startups in India");
    assert_eq!(
        entry.person.as_ref().unwrap().full_name.as_deref(),
        Some("Ravi Kumar")
    );
    assert_eq!(entry.company.as_ref().unwrap().name.as_deref(), Some("FinCo"));

    search.assert_async().await;
    bulk.assert_async().await;
}

/// Test that a failing PDL search does not block FullEnrich
#[tokio::test]
async fn test_failed_source_is_isolated() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_pdl_search(&mut server, 500).await;
    let bulk = mock_fullenrich_bulk(&mut server).await;

    let config = with_fullenrich(with_pdl(offline_config(), &server.url()), &server.url());
    let service = build_service(&config, Some(ScriptedModel::replying(INTENT_REPLY)));

    let response = service.process("CTOs at fintech startups in India", true).await;

    assert!(response.success);
    assert_eq!(response.sources, vec!["FullEnrich"]);
    match response.data {
        Some(EnrichmentPayload::Search { total_results, .. }) => assert_eq!(total_results, 2),
        other => panic!("expected search payload, got {:?}", other),
    }
    bulk.assert_async().await;
}

/// Test that one search submits exactly one FullEnrich bulk job
#[tokio::test]
async fn test_fullenrich_only_submits_one_bulk_job() {
    let mut server = mockito::Server::new_async().await;
    let bulk = mock_fullenrich_bulk(&mut server).await;

    let config = with_fullenrich(offline_config(), &server.url());
    let service = build_service(&config, Some(ScriptedModel::replying(INTENT_REPLY)));

    let response = service.process("CTOs at fintech startups in India", true).await;

    bulk.assert_async().await;
    assert!(response.success);
    assert_eq!(response.sources, vec!["FullEnrich"]);
    match response.data {
        Some(EnrichmentPayload::Search { total_results, .. }) => assert_eq!(total_results, 2),
        other => panic!("expected search payload, got {:?}", other),
    }
}

/// Test that a failing language model falls back to the default intent
#[tokio::test]
async fn test_model_failure_uses_fallback_intent() {
    let service = build_service(&offline_config(), Some(FailingModel::new()));
    let query = "Marketing directors in Berlin";

    let response = service.process(query, true).await;

    assert!(response.success);
    assert_eq!(response.extracted_data, Some(ExtractedIntent::fallback(query)));
    assert!(response.sources.is_empty());
    match response.data {
        Some(EnrichmentPayload::Search {
            results,
            total_results,
            ..
        }) => {
            assert!(results.is_empty());
            assert_eq!(total_results, 0);
        }
        other => panic!("expected search payload, got {:?}", other),
    }
    assert!(response.processing_time >= 0.0);
    assert_eq!(service.history().count(), 1);
}

struct PanickingSource;

#[async_trait]
impl SourceAdapter for PanickingSource {
    fn name(&self) -> &str {
        "panicking"
    }

    fn display_name(&self) -> &str {
        "Panicking"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn search(&self, _intent: &ExtractedIntent) -> Result<Vec<RawRecord>> {
        panic!("source exploded");
    }
}

/// Test that a panic inside the pipeline becomes a failed outcome
#[tokio::test]
async fn test_panic_becomes_failed_outcome() {
    let config = offline_config();
    let registry = Arc::new(SourceRegistry::load(&config.providers));
    let lookup = Arc::new(PdlClient::new(registry.get("pdl").unwrap()).unwrap());

    let mut pipeline = SourcePipeline::new(&config.enrichment);
    pipeline.register_source(Arc::new(PanickingSource));

    let history = Arc::new(HistoryLedger::new(10));
    let service = EnrichmentService::from_parts(
        registry,
        lookup,
        IntentExtractor::new(Some(ScriptedModel::replying(INTENT_REPLY))),
        pipeline,
        Arc::clone(&history),
        50,
    );

    let response = service.process("CTOs at fintech startups in India", true).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Internal error: source exploded")
    );
    assert!(response.data.is_none());
    assert_eq!(history.count(), 0);
}
