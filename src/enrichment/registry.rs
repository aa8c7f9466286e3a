use crate::config::{ProviderConfig, ProvidersConfig};
use serde::Serialize;
use tracing::info;

/// Registry key of the structured people/company data provider
pub const PDL: &str = "pdl";
/// Registry key of the bulk contact provider
pub const FULLENRICH: &str = "fullenrich";
pub const FRECKLE: &str = "freckle";
pub const TELESCOPE: &str = "telescope";

/// One upstream enrichment source
#[derive(Debug, Clone, Serialize)]
pub struct SourceDescriptor {
    /// Registry key
    pub key: String,

    /// Display name
    pub name: String,

    #[serde(skip)]
    pub api_key: Option<String>,

    pub base_url: String,

    /// True iff a credential is present
    pub enabled: bool,

    #[serde(skip)]
    pub settings: ProviderConfig,
}

impl SourceDescriptor {
    fn from_config(key: &str, name: &str, settings: &ProviderConfig) -> Self {
        let api_key = settings.resolve_api_key();
        Self {
            key: key.to_string(),
            name: name.to_string(),
            enabled: api_key.is_some(),
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            settings: settings.clone(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Snapshot of configured sources, in provider priority order.
///
/// Built once at startup; credentials are not re-read afterwards.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    /// Build the registry from provider configuration and the environment
    pub fn load(providers: &ProvidersConfig) -> Self {
        let sources = vec![
            SourceDescriptor::from_config(PDL, "People Data Labs", &providers.pdl),
            SourceDescriptor::from_config(FULLENRICH, "FullEnrich", &providers.fullenrich),
            SourceDescriptor::from_config(FRECKLE, "Freckle", &providers.freckle),
            SourceDescriptor::from_config(TELESCOPE, "Telescope", &providers.telescope),
        ];

        for source in &sources {
            info!(
                source = %source.key,
                enabled = source.enabled,
                base_url = %source.base_url,
                "Registered enrichment source"
            );
        }

        Self { sources }
    }

    pub fn get(&self, key: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.key == key)
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).map(|s| s.enabled).unwrap_or(false)
    }

    /// All sources in registration order
    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    /// Display names of enabled sources
    pub fn enabled_names(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
