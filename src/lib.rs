//! App Census - inventory of installed and used desktop applications
//!
//! This library merges two signals: shortcut names under the Start Menu
//! program folders, and per-application launch counters decoded from the
//! UserAssist usage store. The result is a single ranked list.

pub mod census;
pub mod config;
pub mod inventory;
pub mod sources;
pub mod ui;
