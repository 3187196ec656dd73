//! Name-keyed aggregation of decoded usage records.
//!
//! Records from different counter-store sections often normalize to the same
//! friendly name (`notepad` launched by path and through a known folder, for
//! example). Their counts are summed, never overwritten.

use super::decoder::{DecodedUsage, RawUsageRecord};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::thread;

/// Below this many records, parallel aggregation falls back to a single pass.
pub const PARALLEL_THRESHOLD: usize = 512;

/// Summed usage for one friendly name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotal {
    pub count: u32,
    /// Latest launch time seen across all contributing records
    pub last_run: Option<DateTime<Utc>>,
}

impl UsageTotal {
    fn absorb(&mut self, count: u32, last_run: Option<DateTime<Utc>>) {
        self.count = self.count.saturating_add(count);
        self.last_run = self.last_run.max(last_run);
    }
}

/// Mapping from friendly name to summed usage.
///
/// Backed by an ordered map so iteration order is deterministic, which keeps
/// reconciliation output reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedUsage {
    totals: BTreeMap<String, UsageTotal>,
}

impl AggregatedUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate records in a single pass.
    pub fn from_records(records: &[RawUsageRecord]) -> Self {
        records.iter().map(RawUsageRecord::decode).collect()
    }

    /// Aggregate records across `workers` threads.
    ///
    /// Each worker decodes and sums its own chunk into a private map; the
    /// partial maps are merged afterwards, so no lock is shared.
    pub fn from_records_parallel(records: &[RawUsageRecord], workers: usize) -> Self {
        let workers = workers.max(1);
        if workers == 1 || records.len() < PARALLEL_THRESHOLD {
            return Self::from_records(records);
        }

        let chunk_size = records.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || Self::from_records(chunk)))
                .collect();

            let mut merged = Self::new();
            for handle in handles {
                match handle.join() {
                    Ok(partial) => merged.merge(partial),
                    // Decoding is total; a panic here means a bug, not bad data.
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            merged
        })
    }

    /// Add one decoded record, summing on name collision.
    pub fn add(&mut self, usage: DecodedUsage) {
        self.totals
            .entry(usage.friendly_name)
            .or_default()
            .absorb(usage.count, usage.last_run);
    }

    /// Fold another aggregation into this one.
    pub fn merge(&mut self, other: AggregatedUsage) {
        for (name, total) in other.totals {
            self.totals
                .entry(name)
                .or_default()
                .absorb(total.count, total.last_run);
        }
    }

    /// Summed count for `name`, 0 when never seen.
    pub fn count(&self, name: &str) -> u32 {
        self.totals.get(name).map_or(0, |t| t.count)
    }

    pub fn get(&self, name: &str) -> Option<&UsageTotal> {
        self.totals.get(name)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Iterate `(name, total)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UsageTotal)> {
        self.totals.iter().map(|(name, total)| (name.as_str(), total))
    }
}

impl FromIterator<DecodedUsage> for AggregatedUsage {
    fn from_iter<I: IntoIterator<Item = DecodedUsage>>(iter: I) -> Self {
        let mut aggregated = Self::new();
        for usage in iter {
            aggregated.add(usage);
        }
        aggregated
    }
}
