pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::{enrichment::EnrichmentService, history::HistoryLedger, webhooks::WebhookInbox};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EnrichmentService>,
    pub history: Arc<HistoryLedger>,
    pub webhooks: Arc<WebhookInbox>,
}

impl AppState {
    /// State sharing the service's history ledger
    pub fn new(service: Arc<EnrichmentService>) -> Self {
        let history = Arc::clone(service.history());
        Self {
            service,
            history,
            webhooks: Arc::new(WebhookInbox::new()),
        }
    }
}
