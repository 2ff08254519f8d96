//! Tool configuration, loaded from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::ExtractConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub caldav_url: String,
    pub caldav_username: String,
    pub caldav_password: String,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub pushbullet_api_key: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub extraction: ExtractConfig,
}

fn default_verify_ssl() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SyncConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: SyncConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("caldav_url", &self.caldav_url),
            ("caldav_username", &self.caldav_username),
            ("caldav_password", &self.caldav_password),
        ] {
            if value.trim().is_empty() {
                bail!("Missing required configuration field: {name}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("calsync_{}_{}.json", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    const MINIMAL: &str = r#"{
        "caldav_url": "https://cal.example.com/work/",
        "caldav_username": "user",
        "caldav_password": "secret"
    }"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let path = scratch_file("config_minimal", MINIMAL);
        let config = SyncConfig::load_from_file(&path).unwrap();

        assert!(config.verify_ssl);
        assert!(config.pushbullet_api_key.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.extraction.min_confidence, 50);
        assert_eq!(config.extraction.default_partial_duration_minutes, 15);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_required_field_names_it() {
        let path = scratch_file(
            "config_missing",
            r#"{"caldav_url": "https://cal.example.com/", "caldav_username": "user"}"#,
        );
        let err = SyncConfig::load_from_file(&path).unwrap_err();

        assert!(format!("{err:#}").contains("caldav_password"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let path = scratch_file(
            "config_blank",
            r#"{"caldav_url": " ", "caldav_username": "user", "caldav_password": "secret"}"#,
        );
        let err = SyncConfig::load_from_file(&path).unwrap_err();

        assert!(format!("{err:#}").contains("caldav_url"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn extraction_thresholds_are_overridable() {
        let path = scratch_file(
            "config_extraction",
            r#"{
                "caldav_url": "https://cal.example.com/work/",
                "caldav_username": "user",
                "caldav_password": "secret",
                "extraction": {"min_confidence": 70, "row_window_height": 40}
            }"#,
        );
        let config = SyncConfig::load_from_file(&path).unwrap();

        assert_eq!(config.extraction.min_confidence, 70);
        assert_eq!(config.extraction.row_window_height, 40);
        // Untouched thresholds keep their defaults
        assert_eq!(config.extraction.event_gutter_x, 140);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let path = scratch_file("config_roundtrip", MINIMAL);
        let mut config = SyncConfig::load_from_file(&path).unwrap();
        config.extraction.strict = true;

        config.save_to_file(&path).unwrap();
        let reloaded = SyncConfig::load_from_file(&path).unwrap();

        assert!(reloaded.extraction.strict);
        let _ = fs::remove_file(&path);
    }
}
