use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "SOLACE_MODEL";
pub const BASE_URL_ENV: &str = "SOLACE_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the completion service
    pub openai_api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Service root, without the `/v1/...` path
    pub base_url: String,

    /// Upper bound on generated tokens per reply
    pub max_tokens: u32,

    /// Optional per-request timeout; requests are unbounded when unset
    pub request_timeout_secs: Option<u64>,

    /// UI preferences
    pub ui: UiConfig,

    /// Solace home directory (config file and logs)
    #[serde(skip)]
    pub solace_home: PathBuf,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: None,
            ui: UiConfig::default(),
            solace_home: home.join(".solace"),
        }
    }
}

impl Config {
    /// Load configuration from `~/.solace/config.toml` and the process environment
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        let solace_home = home.join(".solace");

        let mut config = Self::load_from(&solace_home.join("config.toml"))?;
        config.solace_home = solace_home;
        config.apply_env(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overlay environment variables. Non-empty values win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = get(MODEL_ENV) {
            self.model = model;
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            self.base_url = base_url;
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.solace_home)
            .context("Failed to create .solace directory")?;

        let config_path = self.config_path();
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(config_path)
    }

    pub fn config_path(&self) -> PathBuf {
        self.solace_home.join("config.toml")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.solace_home.join("logs")
    }

    /// Check if API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    /// The credential, or the startup error that makes the session unavailable
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)
    }

    /// Copy suitable for printing, with the credential masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.openai_api_key = copy.openai_api_key.as_deref().map(mask_key);
        copy
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.request_timeout_secs, None);
        assert!(!config.has_api_key());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = \"gpt-4o-mini\"\n[ui]\nshow_timestamps = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.ui.show_timestamps);
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_tokens = \"many\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config {
            openai_api_key: Some("from-file".into()),
            ..Config::default()
        };
        config.apply_env(env(&[
            (API_KEY_ENV, "from-env"),
            (MODEL_ENV, "gpt-4o"),
        ]));

        assert_eq!(config.api_key().unwrap(), "from-env");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut config = Config::default();
        config.apply_env(env(&[(API_KEY_ENV, "   ")]));
        assert!(matches!(config.api_key(), Err(ConfigError::MissingCredential)));

        config.openai_api_key = Some(String::new());
        assert!(!config.has_api_key());
    }

    #[test]
    fn save_round_trips_without_home_field() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            solace_home: dir.path().join(".solace"),
            max_tokens: 300,
            ..Config::default()
        };

        let path = config.save().unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.max_tokens, 300);
        assert!(!fs::read_to_string(&path).unwrap().contains("solace_home"));
    }

    #[test]
    fn redaction_masks_the_key() {
        let config = Config {
            openai_api_key: Some("sk-abcdefghijklmnop".into()),
            ..Config::default()
        };
        assert_eq!(config.redacted().openai_api_key.as_deref(), Some("****mnop"));

        let short = Config {
            openai_api_key: Some("sk-1".into()),
            ..Config::default()
        };
        assert_eq!(short.redacted().openai_api_key.as_deref(), Some("****"));
    }
}
