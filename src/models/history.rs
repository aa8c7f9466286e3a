use crate::models::{CompanyInfo, PersonInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded enrichment outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier
    pub id: String,

    /// Input exactly as the caller sent it
    pub input_data: String,

    pub person: Option<PersonInfo>,

    pub company: Option<CompanyInfo>,

    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry with a fresh id and the current time
    pub fn new(
        input_data: impl Into<String>,
        person: Option<PersonInfo>,
        company: Option<CompanyInfo>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input_data: input_data.into(),
            person,
            company,
            timestamp: Utc::now(),
        }
    }
}
