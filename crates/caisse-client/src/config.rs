//! # Caisse Configuration
//!
//! Where the backend lives and how the checkout screen behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAISSE_BASE_URL=http://192.168.1.20:8000                           │
//! │     CAISSE_CSRF_TOKEN=...                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos/caisse.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.caisse.pos/caisse.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:8000, 300 ms debounce, FCFA                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # caisse.toml
//! [server]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 10
//! # csrf_token = "..."   # otherwise read from the checkout page
//!
//! [search]
//! debounce_ms = 300
//!
//! [display]
//! currency = "FCFA"
//!
//! [payment]
//! default_method = "especes"
//! ```

use caisse_core::PaymentMethod;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Origin of the Django backend, without the `/caisse/` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Fixed CSRF token. When absent it is scraped from the checkout page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            csrf_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before the search fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Suffix printed after every amount.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "FCFA".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// Method preselected in the payment modal.
    #[serde(default)]
    pub default_method: PaymentMethod,
}

// =============================================================================
// Caisse Config
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaisseConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub payment: PaymentSettings,
}

impl CaisseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (caisse.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading caisse config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load caisse config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Caisse config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        let base = &self.server.base_url;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                base
            )));
        }
        url::Url::parse(base)?;

        if self.server.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CAISSE_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.server.base_url = url;
        }

        if let Ok(token) = std::env::var("CAISSE_CSRF_TOKEN") {
            self.server.csrf_token = Some(token);
        }

        if let Ok(timeout) = std::env::var("CAISSE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.server.timeout_secs = t;
            }
        }

        if let Ok(debounce) = std::env::var("CAISSE_SEARCH_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse::<u64>() {
                debug!(debounce_ms = ms, "Overriding search debounce from environment");
                self.search.debounce_ms = ms;
            }
        }

        if let Ok(currency) = std::env::var("CAISSE_CURRENCY") {
            self.display.currency = currency;
        }

        if let Ok(method) = std::env::var("CAISSE_PAYMENT_METHOD") {
            match method.parse() {
                Ok(parsed) => self.payment.default_method = parsed,
                Err(_) => warn!(method = %method, "Unknown payment method in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "caisse", "pos")
            .map(|dirs| dirs.config_dir().join("caisse.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaisseConfig::default();
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.display.currency, "FCFA");
        assert_eq!(config.payment.default_method, PaymentMethod::Especes);
        assert!(config.server.csrf_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CaisseConfig::default();

        config.server.base_url = "ftp://caisse.local".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.server.base_url = "https://caisse.example.com".to_string();
        assert!(config.validate().is_ok());

        config.server.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: CaisseConfig = toml::from_str(
            r#"
            [server]
            base_url = "http://10.0.0.5:8000"

            [payment]
            default_method = "ticket_resto"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.payment.default_method, PaymentMethod::TicketResto);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&CaisseConfig::default()).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("default_method = \"especes\""));
        assert!(!toml_str.contains("csrf_token"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("caisse-config-test-missing.toml");
        let _ = std::fs::remove_file(&path);
        let config = CaisseConfig::load_or_default(Some(path));
        assert_eq!(config.search.debounce_ms, CaisseConfig::default().search.debounce_ms);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "caisse-config-test-{}.toml",
            std::process::id()
        ));
        let mut config = CaisseConfig::default();
        config.display.currency = "€".to_string();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: CaisseConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.display.currency, "€");

        let _ = std::fs::remove_file(&path);
    }
}
