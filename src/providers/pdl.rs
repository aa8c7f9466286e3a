use crate::enrichment::normalize::{company_from_person, normalize_company, normalize_person};
use crate::enrichment::registry::SourceDescriptor;
use crate::error::{AppError, Result};
use crate::models::{CompanyInfo, ExtractedIntent, PersonInfo, RawRecord};
use crate::providers::build_http_client;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where a direct lookup's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOrigin {
    Live,
    Mock,
}

/// Person and company found by a direct email or domain lookup
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub person: Option<PersonInfo>,
    pub company: Option<CompanyInfo>,
    pub origin: LookupOrigin,
}

/// People Data Labs client.
///
/// Direct lookups never fail: without a credential, or on any upstream
/// error, they return deterministic mock data derived from the input.
#[derive(Clone)]
pub struct PdlClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PdlClient {
    pub fn new(source: &SourceDescriptor) -> Result<Self> {
        if source.api_key.is_none() {
            info!("No PDL API key configured, direct lookups will use mock data");
        }

        Ok(Self {
            client: build_http_client(source.settings.timeout_secs)?,
            base_url: source.base_url.clone(),
            api_key: source.api_key.clone(),
        })
    }

    /// True when lookups go to the live API
    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    /// Enrich an email address
    pub async fn enrich_email(&self, email: &str) -> LookupResult {
        if !self.is_live() {
            return mock_person_lookup(email);
        }

        match self.fetch_record("person/enrich", &[("email", email)]).await {
            Ok(record) => {
                let company = company_from_person(&record);
                let person = normalize_person(&record);
                LookupResult {
                    person: Some(person),
                    company,
                    origin: LookupOrigin::Live,
                }
            }
            Err(e) => {
                warn!(error = %e, "PDL person enrichment failed, using mock data");
                mock_person_lookup(email)
            }
        }
    }

    /// Enrich a company domain
    pub async fn enrich_domain(&self, domain: &str) -> LookupResult {
        if !self.is_live() {
            return mock_company_lookup(domain);
        }

        match self.fetch_record("company/enrich", &[("website", domain)]).await {
            Ok(record) => LookupResult {
                person: None,
                company: Some(normalize_company(&record)),
                origin: LookupOrigin::Live,
            },
            Err(e) => {
                warn!(error = %e, "PDL company enrichment failed, using mock data");
                mock_company_lookup(domain)
            }
        }
    }

    /// Person search driven by an extracted intent
    pub async fn search_people(
        &self,
        intent: &ExtractedIntent,
        size: usize,
    ) -> Result<Vec<RawRecord>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("PDL API key not set".to_string()))?;

        let params = search_params(intent, api_key, size);
        let url = format!("{}/person/search", self.base_url);

        debug!(url = %url, size, "Querying PDL person search");

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(AppError::integration(
                "pdl",
                format!("person search returned {}", response.status()),
            ));
        }

        let body = response.json::<Value>().await?;
        Ok(RawRecord::list_from_value(body.get("data")))
    }

    async fn fetch_record(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<RawRecord> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("PDL API key not set".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", api_key)
            .query(query)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::integration(
                "pdl",
                format!("{} returned {}", endpoint, response.status()),
            ));
        }

        let body = response.json::<Value>().await?;
        if body.get("status").and_then(Value::as_u64) != Some(200) {
            return Err(AppError::integration(
                "pdl",
                format!("{} reported status {:?}", endpoint, body.get("status")),
            ));
        }

        // Person responses wrap the record in `data`; company responses are flat
        let record = match body.get("data").cloned() {
            Some(data) => RawRecord::from_value(data),
            None => RawRecord::from_value(body),
        };

        record
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::integration("pdl", format!("{} returned no data", endpoint)))
    }
}

/// Query parameters for a person search; only populated intent fields are sent
fn search_params(intent: &ExtractedIntent, api_key: &str, size: usize) -> Vec<(&'static str, String)> {
    let mut params = vec![("api_key", api_key.to_string()), ("size", size.to_string())];

    if !intent.target_roles.is_empty() {
        params.push(("job_title", intent.target_roles.join(" OR ")));
    }
    if !intent.industries.is_empty() {
        params.push(("industry", intent.industries.join(" OR ")));
    }
    if let Some(region) = &intent.region {
        params.push(("location", region.clone()));
    }
    if !intent.keywords.is_empty() {
        params.push(("keywords", intent.keywords.join(" ")));
    }

    params
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Mock person and employer derived from the email's local part and domain
pub fn mock_person_lookup(email: &str) -> LookupResult {
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
    let mut name_parts = local.split('.');
    let first_name = capitalize(name_parts.next().unwrap_or_default());
    let last_name = name_parts
        .next()
        .map(capitalize)
        .unwrap_or_else(|| "Doe".to_string());

    let person = PersonInfo {
        full_name: Some(format!("{} {}", first_name, last_name)),
        job_title: Some("Software Engineer".to_string()),
        email: Some(email.to_string()),
        linkedin_profile: Some(format!(
            "https://linkedin.com/in/{}{}",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        )),
        company: Some("Example Corp".to_string()),
        ..Default::default()
    };

    let company = CompanyInfo {
        name: Some("Example Corp".to_string()),
        domain: Some(domain.to_string()),
        size: Some("50-100 employees".to_string()),
        location: Some("San Francisco, CA".to_string()),
        industry: Some("Technology".to_string()),
        website: Some(format!("https://{}", domain)),
        ..Default::default()
    };

    LookupResult {
        person: Some(person),
        company: Some(company),
        origin: LookupOrigin::Mock,
    }
}

/// Mock company named after the domain's first label
pub fn mock_company_lookup(domain: &str) -> LookupResult {
    let label = domain.split('.').next().unwrap_or(domain);

    let company = CompanyInfo {
        name: Some(format!("{} Corp", capitalize(label))),
        domain: Some(domain.to_string()),
        size: Some("100-500 employees".to_string()),
        location: Some("New York, NY".to_string()),
        industry: Some("Technology".to_string()),
        website: Some(format!("https://{}", domain)),
        ..Default::default()
    };

    LookupResult {
        person: None,
        company: Some(company),
        origin: LookupOrigin::Mock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_person_from_dotted_local_part() {
        let result = mock_person_lookup("john.doe@example.com");
        let person = result.person.unwrap();

        assert_eq!(result.origin, LookupOrigin::Mock);
        assert_eq!(person.full_name.as_deref(), Some("John Doe"));
        assert_eq!(person.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(
            person.linkedin_profile.as_deref(),
            Some("https://linkedin.com/in/johndoe")
        );

        let company = result.company.unwrap();
        assert_eq!(company.domain.as_deref(), Some("example.com"));
        assert_eq!(company.website.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_mock_person_single_part_local() {
        let person = mock_person_lookup("ADA@acme.io").person.unwrap();
        assert_eq!(person.full_name.as_deref(), Some("Ada Doe"));
    }

    #[test]
    fn test_mock_company() {
        let company = mock_company_lookup("globex.com").company.unwrap();
        assert_eq!(company.name.as_deref(), Some("Globex Corp"));
        assert_eq!(company.size.as_deref(), Some("100-500 employees"));
        assert_eq!(company.location.as_deref(), Some("New York, NY"));
    }

    #[test]
    fn test_search_params_skip_empty_fields() {
        let intent = ExtractedIntent {
            target_roles: vec!["CTO".to_string(), "VP Engineering".to_string()],
            region: Some("India".to_string()),
            ..Default::default()
        };

        let params = search_params(&intent, "key", 10);
        let find = |name: &str| params.iter().find(|(k, _)| *k == name).map(|(_, v)| v.clone());

        assert_eq!(find("job_title").as_deref(), Some("CTO OR VP Engineering"));
        assert_eq!(find("location").as_deref(), Some("India"));
        assert_eq!(find("size").as_deref(), Some("10"));
        assert!(find("industry").is_none());
        assert!(find("keywords").is_none());
    }
}
