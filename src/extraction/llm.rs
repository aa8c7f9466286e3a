use crate::config::LlmConfig;
use crate::error::{AppError, Result};
use crate::providers::build_http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

/// Text-in/text-out language model used for intent extraction
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logging
    fn model_name(&self) -> &str;

    /// Run one system + user exchange and return the reply text
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenAiChatModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatModel {
    /// Build the client, or `None` when no API key is configured
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.resolve_api_key() else {
            info!(
                env = %config.api_key_env,
                "No language model API key set, AI mode disabled"
            );
            return Ok(None);
        };

        info!(model = %config.model, "Language model client initialized");

        Ok(Some(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }))
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::integration(
                "llm",
                format!("chat completion returned {}: {}", status, text),
            ));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::integration("llm", "chat completion returned no content"))?;

        debug!(chars = content.len(), "Language model replied");
        Ok(content)
    }
}
