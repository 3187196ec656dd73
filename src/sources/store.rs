//! # Usage Counter Store
//!
//! Abstracts the per-user launch counters as named sections of opaque
//! `(value name, bytes)` pairs. The engine never talks to the platform
//! directly; it reads through a [`UsageStore`].
//!
//! ## Implementations
//!
//! | Store | Backing data |
//! |-------|--------------|
//! | [`MemoryUsageStore`] | in-memory fixtures |
//! | [`SnapshotUsageStore`] | JSON snapshot file |
//! | `RegistryUsageStore` | `HKCU\...\Explorer\UserAssist\{section}\Count` (Windows only) |
//!
//! ## Snapshot Format
//!
//! ```json
//! {
//!   "sections": {
//!     "{CEBFF5CD-ACE2-4F4F-9178-9926F41749EA}": [
//!       { "name": "P:\\Jvaqbjf\\abgrcnq.rkr", "data": "AAAAAAUAAAA=" }
//!     ]
//!   }
//! }
//! ```
//!
//! `data` is the base64-encoded value blob.

use crate::inventory::RawUsageRecord;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// UserAssist sections holding executable and shortcut launch counters.
pub const USERASSIST_SECTIONS: [&str; 2] = [
    "{CEBFF5CD-ACE2-4F4F-9178-9926F41749EA}",
    "{F2A1CB5A-E3CC-4A2E-AF9D-505A7009D442}",
];

/// Registry path of a section's counters, relative to `HKEY_CURRENT_USER`.
pub fn count_key_path(section: &str) -> String {
    format!(
        "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\UserAssist\\{}\\Count",
        section
    )
}

/// A source of raw counter records, grouped by section.
pub trait UsageStore {
    /// All records in `section`.
    ///
    /// `Ok(None)` means the section does not exist. `Err` means it exists
    /// but could not be read.
    fn read_section(&self, section: &str) -> Result<Option<Vec<RawUsageRecord>>>;
}

/// Read every listed section, in order, concatenating their records.
///
/// Absent and unreadable sections contribute nothing.
pub fn read_usage_store(store: &dyn UsageStore, sections: &[String]) -> Vec<RawUsageRecord> {
    let mut records = Vec::new();

    for section in sections {
        match store.read_section(section) {
            Ok(Some(found)) => {
                tracing::debug!(section = %section, records = found.len(), "read usage section");
                records.extend(found);
            }
            Ok(None) => {
                tracing::debug!(section = %section, "usage section absent");
            }
            Err(err) => {
                tracing::warn!(section = %section, "Failed to read usage section: {:#}", err);
            }
        }
    }

    records
}

/// In-memory store, mainly for fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageStore {
    sections: BTreeMap<String, Vec<RawUsageRecord>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a whole section.
    pub fn with_section(
        mut self,
        section: impl Into<String>,
        records: Vec<RawUsageRecord>,
    ) -> Self {
        self.insert_section(section, records);
        self
    }

    pub fn insert_section(&mut self, section: impl Into<String>, records: Vec<RawUsageRecord>) {
        self.sections.insert(section.into(), records);
    }
}

impl UsageStore for MemoryUsageStore {
    fn read_section(&self, section: &str) -> Result<Option<Vec<RawUsageRecord>>> {
        Ok(self.sections.get(section).cloned())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    #[serde(default)]
    sections: BTreeMap<String, Vec<SnapshotValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotValue {
    name: String,
    data: String,
}

/// Store backed by a JSON snapshot of the counter sections.
#[derive(Debug, Clone, Default)]
pub struct SnapshotUsageStore {
    inner: MemoryUsageStore,
}

impl SnapshotUsageStore {
    /// Load a snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read usage snapshot: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse usage snapshot: {}", path.display()))
    }

    /// Parse snapshot JSON.
    ///
    /// A value whose `data` is not valid base64 keeps its name with an empty
    /// payload, so it still decodes (with a zero count).
    pub fn parse(contents: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(contents)?;

        let mut inner = MemoryUsageStore::new();
        for (section, values) in file.sections {
            let records = values
                .into_iter()
                .map(|value| {
                    let payload = decode_payload(&value);
                    RawUsageRecord::new(value.name, payload)
                })
                .collect();
            inner.insert_section(section, records);
        }

        Ok(Self { inner })
    }

    /// Capture `sections` from another store as snapshot JSON.
    ///
    /// Absent sections are left out of the snapshot.
    pub fn capture(store: &dyn UsageStore, sections: &[String]) -> Result<String> {
        let mut file = SnapshotFile::default();

        for section in sections {
            let Some(records) = store.read_section(section)? else {
                continue;
            };
            let values = records
                .into_iter()
                .map(|record| SnapshotValue {
                    name: record.encoded_key,
                    data: STANDARD.encode(&record.payload),
                })
                .collect();
            file.sections.insert(section.clone(), values);
        }

        serde_json::to_string_pretty(&file).context("Failed to serialize usage snapshot")
    }
}

/// Base64 payload of a snapshot value; empty when the encoding is invalid.
fn decode_payload(value: &SnapshotValue) -> Vec<u8> {
    STANDARD
        .decode(value.data.as_bytes())
        .unwrap_or_else(|err| {
            tracing::warn!(name = %value.name, "Invalid payload encoding: {}", err);
            Vec::new()
        })
}

impl UsageStore for SnapshotUsageStore {
    fn read_section(&self, section: &str) -> Result<Option<Vec<RawUsageRecord>>> {
        self.inner.read_section(section)
    }
}

#[cfg(windows)]
mod registry {
    use super::{count_key_path, UsageStore};
    use crate::inventory::RawUsageRecord;
    use anyhow::{Context, Result};
    use std::io;
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    /// The current user's UserAssist counters.
    pub struct RegistryUsageStore {
        hive: RegKey,
    }

    impl RegistryUsageStore {
        pub fn current_user() -> Self {
            Self {
                hive: RegKey::predef(HKEY_CURRENT_USER),
            }
        }
    }

    impl UsageStore for RegistryUsageStore {
        fn read_section(&self, section: &str) -> Result<Option<Vec<RawUsageRecord>>> {
            let path = count_key_path(section);
            let key = match self.hive.open_subkey(&path) {
                Ok(key) => key,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to open HKCU\\{}", path))
                }
            };

            let mut records = Vec::new();
            for value in key.enum_values() {
                match value {
                    Ok((name, value)) => {
                        records.push(RawUsageRecord::new(name, value.bytes.to_vec()));
                    }
                    Err(err) => {
                        // Enumeration can't resume past a failed index.
                        tracing::warn!(section = %section, "Stopped enumerating values: {}", err);
                        break;
                    }
                }
            }

            Ok(Some(records))
        }
    }
}

#[cfg(windows)]
pub use registry::RegistryUsageStore;

/// Where the counter records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageSource {
    /// The platform counter store (the registry on Windows)
    System,
    /// A JSON snapshot file
    Snapshot(PathBuf),
}

impl UsageSource {
    /// Open the store and read `sections` from it.
    ///
    /// An unopenable source reads as empty.
    pub fn read(&self, sections: &[String]) -> Vec<RawUsageRecord> {
        match self.open() {
            Ok(store) => read_usage_store(store.as_ref(), sections),
            Err(err) => {
                tracing::warn!("Usage data unavailable: {:#}", err);
                Vec::new()
            }
        }
    }

    /// Open the backing store.
    pub fn open(&self) -> Result<Box<dyn UsageStore>> {
        match self {
            UsageSource::Snapshot(path) => Ok(Box::new(SnapshotUsageStore::open(path)?)),
            UsageSource::System => Ok(system_store()),
        }
    }
}

#[cfg(windows)]
fn system_store() -> Box<dyn UsageStore> {
    Box::new(RegistryUsageStore::current_user())
}

#[cfg(not(windows))]
fn system_store() -> Box<dyn UsageStore> {
    tracing::info!("No platform usage store on this OS; use --usage-file to read a snapshot");
    Box::new(MemoryUsageStore::new())
}
