use crate::extraction::llm::LanguageModel;
use crate::models::ExtractedIntent;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert at extracting structured data from natural language queries about business contacts and leads.

Extract the following information from the user's query:
- target_roles: List of job roles/titles they're looking for
- industries: List of industries they're interested in
- region: Geographic region or country
- company_size: Company size (startup, enterprise, etc.)
- intent: What they want to do (contact, hire, sell to, etc.)
- keywords: Additional relevant keywords
- seniority_level: Seniority level (entry, mid, senior, executive)
- department: Department or function

Return the data as a JSON object with these exact field names.";

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));

/// Turns a free-text lead query into an [`ExtractedIntent`].
///
/// Never fails: a missing model, a transport error or an unparseable reply
/// all yield [`ExtractedIntent::fallback`].
#[derive(Clone, Default)]
pub struct IntentExtractor {
    model: Option<Arc<dyn LanguageModel>>,
}

impl IntentExtractor {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// True when a language model is available
    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn extract(&self, query: &str) -> ExtractedIntent {
        let Some(model) = &self.model else {
            debug!("No language model configured, using fallback intent");
            return ExtractedIntent::fallback(query);
        };

        let user_prompt = format!("Extract structured data from this query: {}", query);

        match model.complete(SYSTEM_PROMPT, &user_prompt).await {
            Ok(reply) => parse_intent(&reply).unwrap_or_else(|| {
                warn!(model = model.model_name(), "Could not parse intent from model reply");
                ExtractedIntent::fallback(query)
            }),
            Err(e) => {
                warn!(model = model.model_name(), error = %e, "Intent extraction failed");
                ExtractedIntent::fallback(query)
            }
        }
    }
}

/// Parse a model reply: whole text, then a fenced block, then the outermost braces
pub fn parse_intent(reply: &str) -> Option<ExtractedIntent> {
    let trimmed = reply.trim();

    if let Some(intent) = parse_object(trimmed) {
        return Some(intent);
    }

    if let Some(block) = FENCED_JSON.captures(trimmed).and_then(|c| c.get(1)) {
        if let Some(intent) = parse_object(block.as_str()) {
            return Some(intent);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

// Only a JSON object counts as an intent
fn parse_object(text: &str) -> Option<ExtractedIntent> {
    match serde_json::from_str::<Value>(text).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}
