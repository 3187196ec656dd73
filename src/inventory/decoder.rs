//! Decoding of raw counter-store records.
//!
//! Each record is an obscured value name plus a binary blob. The layout of
//! the blob, as far as this crate reads it:
//!
//! ```text
//! offset  size  field
//! 0       4     session id (ignored)
//! 4       4     launch count, u32 little-endian
//! ...
//! 60      8     last launch, FILETIME little-endian
//! ```
//!
//! Short blobs are legal: a record without the count field decodes with a
//! count of zero, and one without the timestamp has no `last_run`.

use super::cipher::rot13;
use super::normalize::normalize_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COUNT_OFFSET: usize = 4;
const COUNT_LEN: usize = 4;
const LAST_RUN_OFFSET: usize = 60;
const LAST_RUN_LEN: usize = 8;

/// Seconds between the FILETIME epoch (1601-01-01) and the Unix epoch.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;
const FILETIME_TICKS_PER_SEC: u64 = 10_000_000;

/// One undecoded entry as enumerated from the counter store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUsageRecord {
    /// Rotation-obscured identifier (the value name in the store)
    pub encoded_key: String,
    /// Value blob; may be shorter than the fields read from it
    pub payload: Vec<u8>,
}

impl RawUsageRecord {
    pub fn new(encoded_key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            encoded_key: encoded_key.into(),
            payload: payload.into(),
        }
    }

    /// Decode this record. See [`decode`].
    pub fn decode(&self) -> DecodedUsage {
        decode(&self.encoded_key, &self.payload)
    }
}

/// A decoded `(friendly_name, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUsage {
    pub friendly_name: String,
    pub count: u32,
    pub last_run: Option<DateTime<Utc>>,
}

/// Decode one counter-store entry.
///
/// Never fails: a short payload degrades to a zero count, and when
/// normalization erases the whole identifier the decoded (but unnormalized)
/// string is used as the name instead.
pub fn decode(encoded_key: &str, payload: &[u8]) -> DecodedUsage {
    let raw_identifier = rot13(encoded_key);

    let normalized = normalize_name(&raw_identifier);
    let friendly_name = if normalized.is_empty() {
        raw_identifier
    } else {
        normalized
    };

    DecodedUsage {
        friendly_name,
        count: read_count(payload),
        last_run: read_last_run(payload),
    }
}

/// Launch counter at offset 4, or 0 when the payload is shorter than 8 bytes.
pub fn read_count(payload: &[u8]) -> u32 {
    payload
        .get(COUNT_OFFSET..COUNT_OFFSET + COUNT_LEN)
        .and_then(|bytes| <[u8; COUNT_LEN]>::try_from(bytes).ok())
        .map(u32::from_le_bytes)
        .unwrap_or(0)
}

/// Last launch time, when the payload carries a non-zero FILETIME.
pub fn read_last_run(payload: &[u8]) -> Option<DateTime<Utc>> {
    let bytes = payload.get(LAST_RUN_OFFSET..LAST_RUN_OFFSET + LAST_RUN_LEN)?;
    let ticks = u64::from_le_bytes(<[u8; LAST_RUN_LEN]>::try_from(bytes).ok()?);
    filetime_to_utc(ticks)
}

/// Convert a FILETIME (100ns ticks since 1601-01-01 UTC) to a UTC timestamp.
pub fn filetime_to_utc(ticks: u64) -> Option<DateTime<Utc>> {
    if ticks == 0 {
        return None;
    }

    let secs = i64::try_from(ticks / FILETIME_TICKS_PER_SEC).ok()? - FILETIME_UNIX_OFFSET_SECS;
    let nanos = u32::try_from((ticks % FILETIME_TICKS_PER_SEC) * 100).ok()?;
    DateTime::from_timestamp(secs, nanos)
}
