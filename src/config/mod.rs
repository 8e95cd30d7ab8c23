//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/latvia-explorer/config.toml

pub mod defaults;

use crate::constants::api::{GEMINI_BASE_URL, GEMINI_MODEL};
use crate::constants::storage::APP_DIR_NAME;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query settings
    #[serde(default)]
    pub explore: ExploreConfig,

    /// Content provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreConfig {
    /// Rejection-sampling attempt budget
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Nearby places kept for random queries
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,

    /// Nearby places kept for queries with a target name
    #[serde(default = "default_targeted_nearby_limit")]
    pub targeted_nearby_limit: usize,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Content provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// API root, without the `/v1beta/...` path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Gemini API key
    #[serde(default)]
    pub gemini: String,
}

// Default value functions for serde
fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}
fn default_nearby_limit() -> usize {
    DEFAULT_NEARBY_LIMIT
}
fn default_targeted_nearby_limit() -> usize {
    DEFAULT_TARGETED_NEARBY_LIMIT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_model() -> String {
    GEMINI_MODEL.to_string()
}
fn default_base_url() -> String {
    GEMINI_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},{zoom}z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map={zoom}/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&z={zoom}".to_string(),
    );
    providers
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            nearby_limit: default_nearby_limit(),
            targeted_nearby_limit: default_targeted_nearby_limit(),
            format: default_format(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["explore", "max_attempts"] => Some(self.explore.max_attempts.to_string()),
            ["explore", "nearby_limit"] => Some(self.explore.nearby_limit.to_string()),
            ["explore", "targeted_nearby_limit"] => {
                Some(self.explore.targeted_nearby_limit.to_string())
            }
            ["explore", "format"] => Some(self.explore.format.clone()),

            ["provider", "model"] => Some(self.provider.model.clone()),
            ["provider", "base_url"] => Some(self.provider.base_url.clone()),
            ["provider", "timeout_secs"] => Some(self.provider.timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "gemini"] => Some(self.api_keys.gemini.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["explore", "max_attempts"] => {
                let attempts: usize = parse_value(key, value)?;
                if attempts == 0 {
                    return Err(Error::Config("max_attempts must be at least 1".to_string()));
                }
                self.explore.max_attempts = attempts;
            }
            ["explore", "nearby_limit"] => {
                self.explore.nearby_limit = parse_value(key, value)?;
            }
            ["explore", "targeted_nearby_limit"] => {
                self.explore.targeted_nearby_limit = parse_value(key, value)?;
            }
            ["explore", "format"] => {
                self.explore.format = value.to_string();
            }

            ["provider", "model"] => {
                self.provider.model = value.to_string();
            }
            ["provider", "base_url"] => {
                self.provider.base_url = value.to_string();
            }
            ["provider", "timeout_secs"] => {
                self.provider.timeout_secs = parse_value(key, value)?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            ["api_keys", "gemini"] => {
                self.api_keys.gemini = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "explore.max_attempts",
            "explore.nearby_limit",
            "explore.targeted_nearby_limit",
            "explore.format",
            "provider.model",
            "provider.base_url",
            "provider.timeout_secs",
            "server.host",
            "server.port",
            "url.default",
            "api_keys.gemini",
        ]
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {zoom} placeholders with actual values
    pub fn format_url(
        &self,
        provider: Option<&str>,
        lat: f64,
        lng: f64,
        zoom: u8,
    ) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string())
            .replace("{zoom}", &zoom.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
