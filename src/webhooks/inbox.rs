use crate::error::{AppError, Result};
use crate::models::RawRecord;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// One delivered bulk enrichment result
#[derive(Debug, Clone, Serialize)]
pub struct WebhookReceipt {
    pub enrichment_id: String,
    pub contacts: Vec<RawRecord>,
    pub received_at: DateTime<Utc>,
    pub payload: Value,
}

impl WebhookReceipt {
    /// Build a receipt from a callback body.
    ///
    /// The job id is read from `enrichment_id` or `id`. Contacts come from
    /// `contacts`, or from the `contact` member of each `datas` entry.
    pub fn from_payload(payload: Value) -> Result<Self> {
        let enrichment_id = ["enrichment_id", "id"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Validation("Webhook payload has no enrichment id".to_string())
            })?;

        let contacts = match payload.get("contacts") {
            Some(contacts) => RawRecord::list_from_value(Some(contacts)),
            None => payload
                .get("datas")
                .and_then(Value::as_array)
                .map(|datas| {
                    datas
                        .iter()
                        .filter_map(|d| d.get("contact").cloned())
                        .filter_map(RawRecord::from_value)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Ok(Self {
            enrichment_id,
            contacts,
            received_at: Utc::now(),
            payload,
        })
    }
}

/// Latest receipt per enrichment id
#[derive(Debug, Default)]
pub struct WebhookInbox {
    receipts: DashMap<String, WebhookReceipt>,
}

impl WebhookInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a receipt, replacing any earlier one for the same id
    pub fn record(&self, receipt: WebhookReceipt) {
        info!(
            enrichment_id = %receipt.enrichment_id,
            contacts = receipt.contacts.len(),
            "Webhook receipt stored"
        );
        self.receipts.insert(receipt.enrichment_id.clone(), receipt);
    }

    pub fn get(&self, enrichment_id: &str) -> Option<WebhookReceipt> {
        self.receipts.get(enrichment_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contacts_from_datas() {
        let receipt = WebhookReceipt::from_payload(json!({
            "id": "job-1",
            "datas": [
                {"contact": {"email": "a@x.com"}},
                {"contact": null},
                {"other": 1}
            ]
        }))
        .unwrap();

        assert_eq!(receipt.enrichment_id, "job-1");
        assert_eq!(receipt.contacts.len(), 1);
        assert_eq!(receipt.contacts[0].email(), Some("a@x.com"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let err = WebhookReceipt::from_payload(json!({"contacts": []})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_record_overwrites() {
        let inbox = WebhookInbox::new();
        inbox.record(
            WebhookReceipt::from_payload(json!({"enrichment_id": "e1", "contacts": []})).unwrap(),
        );
        inbox.record(
            WebhookReceipt::from_payload(json!({
                "enrichment_id": "e1",
                "contacts": [{"email": "b@x.com"}]
            }))
            .unwrap(),
        );

        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.get("e1").unwrap().contacts.len(), 1);
        assert!(inbox.get("missing").is_none());
    }
}
