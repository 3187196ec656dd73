//! Reconciliation of the shortcut inventory with aggregated usage.

use super::aggregate::AggregatedUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Names of the shortcuts found under the Start Menu roots.
///
/// Compared against usage names by exact, case-sensitive equality.
pub type ShortcutSet = BTreeSet<String>;

/// One row of the ranked application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: u32,
    /// Whether the name came from the shortcut inventory
    pub is_known_shortcut: bool,
    pub last_run: Option<DateTime<Utc>>,
}

/// Merge shortcut names and usage totals into one ranked list.
///
/// Every shortcut yields a known entry (count 0 when never launched); every
/// usage name without a shortcut yields an unknown entry. Known entries come
/// first, then higher counts. The sort is stable over name-ordered input, so
/// identical inputs always produce identical output.
pub fn reconcile(shortcuts: &ShortcutSet, usage: &AggregatedUsage) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = shortcuts
        .iter()
        .map(|name| {
            let total = usage.get(name).copied().unwrap_or_default();
            RankedEntry {
                name: name.clone(),
                count: total.count,
                is_known_shortcut: true,
                last_run: total.last_run,
            }
        })
        .collect();

    entries.extend(
        usage
            .iter()
            .filter(|(name, _)| !shortcuts.contains(*name))
            .map(|(name, total)| RankedEntry {
                name: name.to_string(),
                count: total.count,
                is_known_shortcut: false,
                last_run: total.last_run,
            }),
    );

    entries.sort_by(rank_order);
    entries
}

/// Known shortcuts first, then descending count.
fn rank_order(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.is_known_shortcut
        .cmp(&a.is_known_shortcut)
        .then_with(|| b.count.cmp(&a.count))
}
