use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What kind of input the caller sent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputKind {
    Email,
    Domain,
    NaturalLanguage,
}

impl InputKind {
    /// Email and domain inputs go straight to the lookup provider
    pub fn is_direct(&self) -> bool {
        matches!(self, InputKind::Email | InputKind::Domain)
    }
}

/// Structured search intent pulled out of a natural-language query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedIntent {
    /// Target job roles
    #[serde(default, deserialize_with = "string_list")]
    pub target_roles: Vec<String>,

    /// Target industries
    #[serde(default, deserialize_with = "string_list")]
    pub industries: Vec<String>,

    /// Target region/country
    #[serde(default, deserialize_with = "optional_string")]
    pub region: Option<String>,

    /// Target company size
    #[serde(default, deserialize_with = "optional_string")]
    pub company_size: Option<String>,

    /// What the user wants to do (contact, hire, sell to)
    #[serde(default, deserialize_with = "optional_string")]
    pub intent: Option<String>,

    /// Additional keywords
    #[serde(default, deserialize_with = "string_list")]
    pub keywords: Vec<String>,

    /// Target seniority level
    #[serde(default, deserialize_with = "optional_string")]
    pub seniority_level: Option<String>,

    /// Target department
    #[serde(default, deserialize_with = "optional_string")]
    pub department: Option<String>,
}

impl ExtractedIntent {
    /// Intent used when the language model is unavailable or unparseable
    pub fn fallback(query: &str) -> Self {
        Self {
            target_roles: vec!["executive".to_string()],
            industries: vec!["technology".to_string()],
            keywords: query
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            ..Default::default()
        }
    }
}

// Models answer with either a list or a single string for list fields, and
// with null or "" for missing scalars. Both are accepted.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(crate::models::record::clean_value)
            .collect(),
        other => crate::models::record::clean_value(&other)
            .into_iter()
            .collect(),
    })
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(crate::models::record::clean_value(&value))
}
