//! Bounded in-memory history of enrichment outcomes

pub mod ledger;

pub use ledger::{HistoryLedger, DEFAULT_HISTORY_CAPACITY};
