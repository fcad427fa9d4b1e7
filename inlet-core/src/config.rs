//! Configuration management
//!
//! Reads `settings.json` from the inlet directory:
//! ```json
//! {
//!   "app": { "defaultPlatform": "cointracking", "sampleLimit": 5 }
//! }
//! ```
//! Unknown fields are tolerated so other tools can share the file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Platform;
use crate::domain::result::Result;

/// Default number of records returned by a sample query
const DEFAULT_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    default_platform: Option<String>,
    #[serde(default)]
    sample_limit: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Inlet configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform assumed when a caller does not name one
    pub default_platform: Platform,
    /// Record count for sample queries when no limit is given
    pub sample_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_platform: Platform::Cointracking,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

impl Config {
    /// Load config from the inlet directory; missing file means defaults
    pub fn load(inlet_dir: &Path) -> Result<Self> {
        let settings_path = inlet_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            default_platform: raw
                .app
                .default_platform
                .as_deref()
                .map(Platform::from_tag)
                .unwrap_or(Platform::Cointracking),
            sample_limit: raw.app.sample_limit.unwrap_or(DEFAULT_SAMPLE_LIMIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_platform, Platform::Cointracking);
        assert_eq!(config.sample_limit, DEFAULT_SAMPLE_LIMIT);
    }

    #[test]
    fn test_settings_override_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"defaultPlatform":"waltio","sampleLimit":10,"theme":"dark"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_platform, Platform::Waltio);
        assert_eq!(config.sample_limit, 10);
    }

    #[test]
    fn test_unparsable_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{broken").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_platform, Platform::Cointracking);
    }
}
