//! Duplicate-free union of scraped batches.

use std::collections::HashSet;

use crate::record::{fields, JobRecord};

/// Which fields decide that two rows are the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Every field, `scraped_time` included. Re-scraping an unchanged
    /// listing later yields a new row.
    #[default]
    ExactRow,
    /// Every field except `scraped_time`.
    IgnoreScrapedTime,
}

impl DedupPolicy {
    fn key<'a>(&self, record: &'a JobRecord) -> Vec<(&'a str, &'a str)> {
        let mut key: Vec<(&str, &str)> = record
            .iter()
            .filter(|(field, _)| {
                *self == DedupPolicy::ExactRow || *field != fields::SCRAPED_TIME
            })
            .collect();
        key.sort_unstable();
        key
    }
}

/// Concatenates the batches in argument order and keeps the first occurrence
/// of every distinct record.
///
/// The newly scraped batch goes first so that its rows win over older copies.
pub fn combine_unique(batches: &[&[JobRecord]], policy: DedupPolicy) -> Vec<JobRecord> {
    let capacity = batches.iter().map(|b| b.len()).sum();
    let mut seen = HashSet::with_capacity(capacity);
    let mut out = Vec::with_capacity(capacity);

    for record in batches.iter().flat_map(|batch| batch.iter()) {
        if seen.insert(policy.key(record)) {
            out.push(record.clone());
        }
    }

    out
}
