use crate::models::HistoryEntry;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// Capacity used when none is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Most-recent-first log of enrichment outcomes with a fixed capacity.
///
/// All access goes through one mutex. Operations are cheap and never await,
/// so the guard is never held across I/O. Readers get cloned snapshots.
#[derive(Debug)]
pub struct HistoryLedger {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Insert at the head, dropping the oldest entries past capacity
    pub fn add(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock();
        debug!(history_id = %entry.id, input = %entry.input_data, "Recording history entry");
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Entries newest first, optionally limited
    pub fn list(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let entries = self.entries.lock();
        let take = limit.unwrap_or(entries.len());
        entries.iter().take(take).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.entries
            .lock()
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Case-insensitive substring match on the original input, in ledger order
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        let needle = query.to_lowercase();
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.input_data.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
