//! # UI Module
//!
//! Interactive terminal view of the ranked application list.
//!
//! ## Components
//!
//! - [`App`] - view state (selection, filters, search, export prompt)
//! - [`mod@render`] - rendering functions for drawing the TUI
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Header                        │
//! ├──────────────┬────────┬─────────────┬───────────┤
//! │ App Name     │ Usage  │ Start Menu? │ Last Run  │
//! │ ...          │        │             │           │
//! ├──────────────┴────────┴─────────────┴───────────┤
//! │         Footer (hints / search / export)         │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod render;

pub use app::App;
pub use render::render;
