//! Receipts for asynchronous bulk enrichment callbacks

pub mod inbox;

pub use inbox::{WebhookInbox, WebhookReceipt};
