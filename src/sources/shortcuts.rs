//! Start Menu shortcut inventory.

use crate::inventory::ShortcutSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default shortcut extension, matched without regard to case.
pub const SHORTCUT_EXTENSION: &str = "lnk";

/// Collect shortcut names from every root, recursively.
///
/// A name is the file name with the shortcut extension removed (`Notepad.lnk`
/// → `Notepad`). Roots that don't exist are skipped.
pub fn list_shortcut_names(roots: &[PathBuf], extension: &str) -> ShortcutSet {
    let mut names = ShortcutSet::new();

    for root in roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "shortcut root missing, skipping");
            continue;
        }

        let before = names.len();
        collect_from_root(root, extension, &mut names);
        tracing::debug!(
            root = %root.display(),
            added = names.len() - before,
            "scanned shortcut root"
        );
    }

    names
}

fn collect_from_root(root: &Path, extension: &str, names: &mut ShortcutSet) {
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Failed to read directory entry: {}", err);
                None
            }
        })
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        if let Some(name) = shortcut_name(filename, extension) {
            names.insert(name.to_string());
        }
    }
}

/// Strip `.{extension}` (any case) from `filename`, if present.
///
/// Returns `None` for other files and for a bare `.lnk` with nothing before it.
pub fn shortcut_name<'a>(filename: &'a str, extension: &str) -> Option<&'a str> {
    let suffix_len = extension.len() + 1;
    let split_at = filename.len().checked_sub(suffix_len)?;
    let (stem, suffix) = (filename.get(..split_at)?, filename.get(split_at..)?);

    let matches = suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension);
    (matches && !stem.is_empty()).then_some(stem)
}
