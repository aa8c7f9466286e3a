use crate::models::RawRecord;
use std::collections::HashSet;

/// Default cap on merged results
pub const MAX_MERGED_RESULTS: usize = 50;

/// Merge per-source result lists into one de-duplicated list.
///
/// Lists are consumed in the order given, which is provider priority order.
/// A record is kept the first time its raw `email` value is seen; records
/// without an email are dropped. The output keeps first-seen order and holds
/// at most `limit` records.
pub fn merge_results(result_lists: Vec<Vec<RawRecord>>, limit: usize) -> Vec<RawRecord> {
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for record in result_lists.into_iter().flatten() {
        if merged.len() == limit {
            break;
        }

        let Some(email) = record.email() else {
            continue;
        };

        if seen_emails.insert(email.to_string()) {
            merged.push(record);
        }
    }

    merged
}
