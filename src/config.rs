use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Fan-out and merge settings
    #[serde(default)]
    pub enrichment: EnrichmentSettings,

    /// History ledger settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Upstream enrichment providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Natural-language extraction backend
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: LER_)
            .add_source(
                config::Environment::with_prefix("LER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; empty means permissive
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Result count requested from each source
    #[serde(default = "default_max_results_per_source")]
    pub max_results_per_source: usize,

    /// Cap applied after merging all sources
    #[serde(default = "default_max_merged_results")]
    pub max_merged_results: usize,

    /// Upper bound on a single adapter call (seconds)
    #[serde(default = "default_adapter_timeout")]
    pub adapter_timeout_secs: u64,

    /// Run adapters concurrently
    #[serde(default = "default_true")]
    pub parallel_fanout: bool,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            max_results_per_source: default_max_results_per_source(),
            max_merged_results: default_max_merged_results(),
            adapter_timeout_secs: default_adapter_timeout(),
            parallel_fanout: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_pdl")]
    pub pdl: ProviderConfig,

    #[serde(default = "default_fullenrich")]
    pub fullenrich: ProviderConfig,

    #[serde(default = "default_freckle")]
    pub freckle: ProviderConfig,

    #[serde(default = "default_telescope")]
    pub telescope: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            pdl: default_pdl(),
            fullenrich: default_fullenrich(),
            freckle: default_freckle(),
            telescope: default_telescope(),
        }
    }
}

/// Connection settings for one upstream provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,

    /// Bulk endpoint, for providers that expose one outside `base_url`
    pub bulk_url: Option<String>,

    /// Environment variable holding the credential
    pub api_key_env: String,

    /// Credential given directly (tests, config files); wins over `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Callback URL for asynchronous results
    pub webhook_url: Option<String>,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bulk_url: None,
            api_key_env: api_key_env.into(),
            api_key: None,
            webhook_url: None,
            timeout_secs: default_provider_timeout(),
        }
    }

    /// Resolve the credential; blank values count as absent
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key_env: default_llm_key_env(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "lead-enrichment-router".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_results_per_source() -> usize {
    10
}

fn default_max_merged_results() -> usize {
    50
}

fn default_adapter_timeout() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    100
}

fn default_provider_timeout() -> u64 {
    30
}

fn default_pdl() -> ProviderConfig {
    ProviderConfig::new("https://api.peopledatalabs.com/v5", "PDL_API_KEY")
}

fn default_fullenrich() -> ProviderConfig {
    ProviderConfig {
        bulk_url: Some("https://app.fullenrich.com/api/v1/contact/enrich/bulk".to_string()),
        webhook_url: Some("https://example.com/webhook".to_string()),
        ..ProviderConfig::new("https://api.fullenrich.com/v1", "FULLENRICH_API_KEY")
    }
}

fn default_freckle() -> ProviderConfig {
    ProviderConfig::new("https://api.freckle.io/v1", "FRECKLE_API_KEY")
}

fn default_telescope() -> ProviderConfig {
    ProviderConfig::new("https://api.telescope.ai/v1", "TELESCOPE_API_KEY")
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.1
}

fn default_llm_max_tokens() -> u32 {
    500
}
