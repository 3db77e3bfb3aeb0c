//! Settings file management for tokbar-settings.
//!
//! Endpoints, timeouts and storage locations are read from a TOML file in the
//! user's config directory. Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// LiteLLM model pricing dataset, probed after every proxy change.
pub const LITELLM_PRICING_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/main/model_prices_and_context_window.json";

/// Right.codes API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RightcodesConfig {
    /// API root, without trailing slash (e.g. "https://right.codes")
    #[serde(default = "default_rightcodes_base_url")]
    pub base_url: String,
    /// Seconds to wait for the TCP/TLS connection
    #[serde(default = "default_rightcodes_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole request
    #[serde(default = "default_rightcodes_timeout")]
    pub timeout_secs: u64,
}

fn default_rightcodes_base_url() -> String {
    "https://right.codes".to_string()
}

fn default_rightcodes_connect_timeout() -> u64 {
    8
}

fn default_rightcodes_timeout() -> u64 {
    12
}

impl Default for RightcodesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rightcodes_base_url(),
            connect_timeout_secs: default_rightcodes_connect_timeout(),
            timeout_secs: default_rightcodes_timeout(),
        }
    }
}

impl RightcodesConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pricing reachability probe settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingConfig {
    #[serde(default = "default_pricing_url")]
    pub url: String,
    #[serde(default = "default_pricing_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_pricing_timeout")]
    pub timeout_secs: u64,
}

fn default_pricing_url() -> String {
    LITELLM_PRICING_URL.to_string()
}

fn default_pricing_connect_timeout() -> u64 {
    3
}

fn default_pricing_timeout() -> u64 {
    8
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            url: default_pricing_url(),
            connect_timeout_secs: default_pricing_connect_timeout(),
            timeout_secs: default_pricing_timeout(),
        }
    }
}

impl PricingConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where proxy settings and the fallback token file live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Data directory override; defaults to `~/.tokbar`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Try the OS credential store before the local token file
    #[serde(default = "default_true")]
    pub use_keyring: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            use_keyring: true,
        }
    }
}

/// Complete settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokbarConfig {
    #[serde(default)]
    pub rightcodes: RightcodesConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TokbarConfig {
    /// Loads settings from the user's config directory.
    ///
    /// A missing file yields defaults.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If the file exists but cannot be read or is not valid TOML
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No settings file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::parse(&fs::read_to_string(&config_path)?)
            .map_err(|e| anyhow::anyhow!("Invalid settings in {}: {e}", config_path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolves the data directory, `~/.tokbar` unless overridden.
    ///
    /// # Errors
    /// - If no override is set and the home directory cannot be determined
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".tokbar"))
    }
}

/// Retrieves the path to the settings file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".config").join("tokbar").join("settings.toml"))
}
