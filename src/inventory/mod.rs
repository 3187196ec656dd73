//! # Inventory Module
//!
//! The decoding and reconciliation engine. Everything here is pure and
//! synchronous; the data sources live in [`crate::sources`].
//!
//! ## Pipeline
//!
//! ```text
//! RawUsageRecord ──decode──▶ DecodedUsage ──sum──▶ AggregatedUsage ─┐
//!                                                                    ├─reconcile──▶ Vec<RankedEntry>
//!                                                  ShortcutSet ──────┘
//! ```
//!
//! | Stage | Module |
//! |-------|--------|
//! | Rotation cipher | [`cipher`] |
//! | Friendly names | [`normalize`] |
//! | Record decoding | [`decoder`] |
//! | Summing | [`aggregate`] |
//! | Ranking | [`reconcile`] |
//! | Text / JSON export | [`export`] |

pub mod aggregate;
pub mod cipher;
pub mod decoder;
pub mod export;
pub mod normalize;
pub mod reconcile;

pub use aggregate::{AggregatedUsage, UsageTotal};
pub use cipher::rot13;
pub use decoder::{decode, DecodedUsage, RawUsageRecord};
pub use export::{
    export_known_shortcuts, known_shortcut_names, ranked_to_json, render_known_shortcuts,
};
pub use normalize::normalize_name;
pub use reconcile::{reconcile, RankedEntry, ShortcutSet};
