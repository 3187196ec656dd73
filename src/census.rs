//! # Census Pipeline
//!
//! Reads both sources and runs the engine:
//!
//! 1. **Shortcuts**: walk the Start Menu roots for shortcut names
//! 2. **Usage**: read the counter-store sections as raw records
//! 3. **Aggregate**: decode and sum records by friendly name
//! 4. **Reconcile**: rank shortcuts and usage into one list
//!
//! Steps 1 and 2 are blocking, one-shot reads and run side by side on the
//! blocking pool; both finish before aggregation starts.

use crate::config::Config;
use crate::inventory::{reconcile, AggregatedUsage, RankedEntry, RawUsageRecord, ShortcutSet};
use crate::sources::{list_shortcut_names, UsageSource};
use anyhow::{Context, Result};
use std::thread;

/// The reconciled inventory plus a few source statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Census {
    pub entries: Vec<RankedEntry>,
    pub shortcut_count: usize,
    pub record_count: usize,
}

impl Census {
    /// Aggregate `records` and reconcile them against `shortcuts`.
    pub fn build(shortcuts: &ShortcutSet, records: &[RawUsageRecord]) -> Self {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let usage = AggregatedUsage::from_records_parallel(records, workers);

        Self {
            entries: reconcile(shortcuts, &usage),
            shortcut_count: shortcuts.len(),
            record_count: records.len(),
        }
    }
}

/// Read both sources concurrently and build the census.
pub async fn run_census(config: &Config, source: UsageSource) -> Result<Census> {
    let roots = config.shortcut_roots.clone();
    let extension = config.shortcut_extension.clone();
    let sections = config.usage_sections.clone();

    let shortcuts_task =
        tokio::task::spawn_blocking(move || list_shortcut_names(&roots, &extension));
    let records_task = tokio::task::spawn_blocking(move || source.read(&sections));

    let shortcuts = shortcuts_task
        .await
        .context("Shortcut scan task failed")?;
    let records = records_task.await.context("Usage store task failed")?;

    tracing::info!(
        shortcuts = shortcuts.len(),
        records = records.len(),
        "sources read"
    );

    Ok(Census::build(&shortcuts, &records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::rot13;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn record(identifier: &str, count: u32) -> RawUsageRecord {
        let mut payload = vec![0u8; 72];
        payload[4..8].copy_from_slice(&count.to_le_bytes());
        RawUsageRecord::new(rot13(identifier), payload)
    }

    #[test]
    fn test_build_census() {
        let shortcuts: ShortcutSet = ["Notepad", "Calc"].iter().map(|s| s.to_string()).collect();
        let records = vec![
            record("C:\\Windows\\notepad.exe", 3),
            record("{1AC14E77-02E7-4E5D-B744-2EB1AE5198B7}\\Notepad.exe", 5),
            record("C:\\Tools\\putty.exe", 11),
        ];

        let census = Census::build(&shortcuts, &records);
        assert_eq!(census.shortcut_count, 2);
        assert_eq!(census.record_count, 3);

        let rows: Vec<(&str, u32, bool)> = census
            .entries
            .iter()
            .map(|e| (e.name.as_str(), e.count, e.is_known_shortcut))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Notepad", 5, true),
                ("Calc", 0, true),
                ("putty", 11, false),
                ("notepad", 3, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_census_with_missing_sources() {
        let config = Config {
            shortcut_roots: vec![PathBuf::from("/nonexistent/start/menu")],
            usage_sections: vec!["{MISSING}".to_string()],
            shortcut_extension: "lnk".to_string(),
        };
        let source = UsageSource::Snapshot(PathBuf::from("/nonexistent/usage.json"));

        let census = run_census(&config, source).await.unwrap();
        assert!(census.entries.is_empty());
        assert_eq!(census.record_count, 0);
    }

    #[tokio::test]
    async fn test_run_census_reads_both_sources() {
        let temp_dir = TempDir::new().unwrap();
        let menu = temp_dir.path().join("Programs");
        fs::create_dir_all(menu.join("Accessories")).unwrap();
        fs::write(menu.join("Accessories").join("Paint.lnk"), "").unwrap();

        let snapshot = temp_dir.path().join("usage.json");
        fs::write(
            &snapshot,
            r#"{"sections": {"{S}": [{"name": "Cnvag.rkr", "data": "AAAAAAkAAAA="}]}}"#,
        )
        .unwrap();

        let config = Config {
            shortcut_roots: vec![menu],
            usage_sections: vec!["{S}".to_string()],
            shortcut_extension: "lnk".to_string(),
        };

        let census = run_census(&config, UsageSource::Snapshot(snapshot))
            .await
            .unwrap();
        assert_eq!(census.entries.len(), 1);
        assert_eq!(census.entries[0].name, "Paint");
        assert_eq!(census.entries[0].count, 9);
        assert!(census.entries[0].is_known_shortcut);
    }
}
