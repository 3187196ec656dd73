//! Export of the ranked list.
//!
//! The text export lists known shortcuts only, one per line, sorted
//! alphabetically without regard to case. It is independent of the display
//! order, which ranks by launch count.

use super::reconcile::RankedEntry;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Names of the known shortcuts, sorted case-insensitively.
///
/// The sort key is `str::to_lowercase`, a per-character lowering rather than
/// full Unicode case folding: `ß` stays `ß` and does not compare equal to `ss`.
pub fn known_shortcut_names(entries: &[RankedEntry]) -> Vec<&str> {
    let mut names: Vec<&str> = entries
        .iter()
        .filter(|e| e.is_known_shortcut)
        .map(|e| e.name.as_str())
        .collect();
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}

/// Render the text export: each known shortcut name followed by `\n`.
pub fn render_known_shortcuts(entries: &[RankedEntry]) -> String {
    known_shortcut_names(entries)
        .into_iter()
        .fold(String::new(), |mut out, name| {
            out.push_str(name);
            out.push('\n');
            out
        })
}

/// Write the text export to `path` as UTF-8. Returns the number of names written.
pub fn export_known_shortcuts(entries: &[RankedEntry], path: &Path) -> Result<usize> {
    let contents = render_known_shortcuts(entries);
    let written = contents.lines().count();

    fs::write(path, contents)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    tracing::info!(path = %path.display(), names = written, "exported known shortcuts");
    Ok(written)
}

/// The full ranked list as pretty-printed JSON, in display order.
pub fn ranked_to_json(entries: &[RankedEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("Failed to serialize ranked entries")
}
