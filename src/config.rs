use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generator::ContentSource;
use crate::generator::remote::{
    DEFAULT_ENCYCLOPEDIA_ENDPOINT, DEFAULT_GENERATOR_ENDPOINT, DEFAULT_QUOTE_ENDPOINT,
};
use crate::keyboard::model::KeyboardModel;
use crate::store::backend::default_data_dir;
use crate::store::progress::DEFAULT_HISTORY_LIMIT;

const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: ContentSource,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub keyboard_hint: bool,
    #[serde(default = "default_true")]
    pub tracking_enabled: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_api_key: Option<String>,
    #[serde(default = "default_quote_endpoint")]
    pub quote_endpoint: String,
    #[serde(default = "default_encyclopedia_endpoint")]
    pub encyclopedia_endpoint: String,
    #[serde(default = "default_generator_endpoint")]
    pub generator_endpoint: String,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
}

fn default_keyboard_layout() -> String {
    "qwerty".to_string()
}
fn default_theme() -> String {
    "midnight".to_string()
}
fn default_true() -> bool {
    true
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_share_base_url() -> String {
    "https://keyline.invalid/shared".to_string()
}
fn default_quote_endpoint() -> String {
    DEFAULT_QUOTE_ENDPOINT.to_string()
}
fn default_encyclopedia_endpoint() -> String {
    DEFAULT_ENCYCLOPEDIA_ENDPOINT.to_string()
}
fn default_generator_endpoint() -> String {
    DEFAULT_GENERATOR_ENDPOINT.to_string()
}
fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: ContentSource::default(),
            keyboard_layout: default_keyboard_layout(),
            theme: default_theme(),
            keyboard_hint: default_true(),
            tracking_enabled: default_true(),
            history_limit: default_history_limit(),
            share_base_url: default_share_base_url(),
            quote_api_key: None,
            quote_endpoint: default_quote_endpoint(),
            encyclopedia_endpoint: default_encyclopedia_endpoint(),
            generator_endpoint: default_generator_endpoint(),
            data_dir: default_data_dir_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyline")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn keyboard(&self) -> KeyboardModel {
        KeyboardModel::from_name(&self.keyboard_layout)
    }

    /// Clamp numeric fields and reset unknown names to their defaults.
    /// Call after deserialization to handle stale or hand-edited files.
    pub fn validate(&mut self) {
        if !(1..=MAX_HISTORY_LIMIT).contains(&self.history_limit) {
            let clamped = self.history_limit.clamp(1, MAX_HISTORY_LIMIT);
            warn!(from = self.history_limit, to = clamped, "history_limit out of range");
            self.history_limit = clamped;
        }
        if !KeyboardModel::names().contains(&self.keyboard_layout.as_str()) {
            warn!(layout = %self.keyboard_layout, "unknown keyboard layout, using qwerty");
            self.keyboard_layout = default_keyboard_layout();
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source, ContentSource::Json);
        assert_eq!(config.keyboard_layout, "qwerty");
        assert_eq!(config.history_limit, 10);
        assert!(config.tracking_enabled);
        assert!(config.keyboard_hint);
        assert!(config.quote_api_key.is_none());
        assert!(!config.data_dir.is_empty());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
source = "array"
keyboard_layout = "dvorak"
quote_api_key = "secret"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source, ContentSource::Array);
        assert_eq!(config.keyboard_layout, "dvorak");
        assert_eq!(config.quote_api_key.as_deref(), Some("secret"));
        assert_eq!(config.theme, "midnight");
    }

    #[test]
    fn test_config_legacy_source_name() {
        let config: Config = toml::from_str("source = \"ninja\"").unwrap();
        assert_eq!(config.source, ContentSource::Quote);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.source, deserialized.source);
        assert_eq!(config.history_limit, deserialized.history_limit);
        assert_eq!(config.share_base_url, deserialized.share_base_url);
        assert_eq!(config.data_dir, deserialized.data_dir);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.history_limit = 0;
        config.keyboard_layout = "azerty".to_string();
        config.validate();
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.keyboard_layout, "qwerty");

        config.history_limit = 5000;
        config.validate();
        assert_eq!(config.history_limit, MAX_HISTORY_LIMIT);
    }

    #[test]
    fn test_validate_keeps_known_layout() {
        let mut config = Config::default();
        config.keyboard_layout = "colemak".to_string();
        config.validate();
        assert_eq!(config.keyboard_layout, "colemak");
        assert_eq!(config.keyboard().name, "colemak");
    }
}
