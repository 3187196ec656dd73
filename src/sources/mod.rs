//! # Data Sources
//!
//! The two inputs of the inventory, both read once at startup:
//!
//! - [`shortcuts`] - shortcut names under the Start Menu program roots
//! - [`store`] - raw launch-counter records from the usage store
//!
//! Neither source fails for absent data. A missing root or section simply
//! contributes nothing.

pub mod shortcuts;
pub mod store;

pub use shortcuts::{list_shortcut_names, shortcut_name, SHORTCUT_EXTENSION};
#[cfg(windows)]
pub use store::RegistryUsageStore;
pub use store::{
    count_key_path, read_usage_store, MemoryUsageStore, SnapshotUsageStore, UsageSource,
    UsageStore, USERASSIST_SECTIONS,
};
