//! # Configuration Persistence
//!
//! Manages user configuration stored in `<config dir>/appcensus/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's platform config directory. Every field has a default, so an
//! absent file (the usual case) behaves like `{}`.
//!
//! ```json
//! {
//!   "shortcut_roots": ["C:\\ProgramData\\Microsoft\\Windows\\Start Menu\\Programs"],
//!   "usage_sections": ["{CEBFF5CD-ACE2-4F4F-9178-9926F41749EA}"],
//!   "shortcut_extension": "lnk"
//! }
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use crate::sources::{SHORTCUT_EXTENSION, USERASSIST_SECTIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Start Menu programs folder, relative to a machine or user profile root.
const START_MENU_PROGRAMS: &str = "Microsoft\\Windows\\Start Menu\\Programs";

const DEFAULT_PROGRAM_DATA: &str = "C:\\ProgramData";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories scanned recursively for shortcuts.
    #[serde(default = "default_shortcut_roots")]
    pub shortcut_roots: Vec<PathBuf>,

    /// Usage-store sections read, in order.
    #[serde(default = "default_usage_sections")]
    pub usage_sections: Vec<String>,

    /// Extension identifying shortcut files, without the dot.
    #[serde(default = "default_shortcut_extension")]
    pub shortcut_extension: String,
}

/// Machine-wide and per-user Start Menu program folders.
///
/// The per-user root is omitted when `APPDATA` is not set.
fn default_shortcut_roots() -> Vec<PathBuf> {
    shortcut_roots_from(
        env::var_os("ProgramData").map(PathBuf::from),
        env::var_os("APPDATA").map(PathBuf::from),
    )
}

fn shortcut_roots_from(program_data: Option<PathBuf>, app_data: Option<PathBuf>) -> Vec<PathBuf> {
    let machine = program_data.unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_DATA));

    let mut roots = vec![machine.join(START_MENU_PROGRAMS)];
    if let Some(user) = app_data {
        roots.push(user.join(START_MENU_PROGRAMS));
    }
    roots
}

fn default_usage_sections() -> Vec<String> {
    USERASSIST_SECTIONS.iter().map(|s| s.to_string()).collect()
}

fn default_shortcut_extension() -> String {
    SHORTCUT_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortcut_roots: default_shortcut_roots(),
            usage_sections: default_usage_sections(),
            shortcut_extension: default_shortcut_extension(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default configuration: {:#}", err);
                Self::default()
            }
        }
    }

    /// Try to load configuration, returning an error on failure.
    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Return the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "appcensus")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.usage_sections.len(), 2);
        assert_eq!(
            config.usage_sections[0],
            "{CEBFF5CD-ACE2-4F4F-9178-9926F41749EA}"
        );
        assert_eq!(
            config.usage_sections[1],
            "{F2A1CB5A-E3CC-4A2E-AF9D-505A7009D442}"
        );
        assert_eq!(config.shortcut_extension, "lnk");
        assert!(!config.shortcut_roots.is_empty());
    }

    #[test]
    fn test_shortcut_roots_from_env() {
        let roots = shortcut_roots_from(
            Some(PathBuf::from("D:\\Data")),
            Some(PathBuf::from("C:\\Users\\sam\\AppData\\Roaming")),
        );
        assert_eq!(
            roots,
            vec![
                PathBuf::from("D:\\Data").join(START_MENU_PROGRAMS),
                PathBuf::from("C:\\Users\\sam\\AppData\\Roaming").join(START_MENU_PROGRAMS),
            ]
        );
    }

    #[test]
    fn test_shortcut_roots_without_env() {
        let roots = shortcut_roots_from(None, None);
        assert_eq!(
            roots,
            vec![PathBuf::from(DEFAULT_PROGRAM_DATA).join(START_MENU_PROGRAMS)]
        );
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"shortcut_extension": "url"}"#)
            .expect("deserialize");
        assert_eq!(config.shortcut_extension, "url");
        assert_eq!(config.usage_sections, default_usage_sections());
    }

    #[test]
    fn test_write_then_load_from_roundtrip() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");

        let config = Config {
            shortcut_roots: vec![PathBuf::from("/opt/menu")],
            usage_sections: vec!["{SECTION}".to_string()],
            shortcut_extension: "lnk".to_string(),
        };

        let contents = serde_json::to_string_pretty(&config).expect("serialize");
        fs::write(&config_path, contents).expect("write");
        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("does_not_exist.json");

        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_from_invalid_file_is_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not valid json").expect("write");

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_deny_unknown_fields() {
        let json = r#"{"shortcut_extension": "lnk", "unknown_field": true}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err(), "should reject unknown fields");
    }
}
