//! Pricing proxy configuration.
//!
//! Four optional endpoints used when fetching third-party pricing data. A field is
//! either a trimmed, non-empty string or `None`; an empty string is never stored
//! or sent anywhere.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Proxy endpoints for the pricing fetch.
///
/// `aggregated` applies to every protocol and wins over the protocol-specific
/// endpoints when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub aggregated: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
    pub socks5: Option<String>,
}

/// Trims free text and maps blank input to `None`.
///
/// Total and idempotent: `normalize(normalize(x))` equals `normalize(x)`.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(normalize)
}

impl ProxyConfig {
    /// Builds a config from raw field text, applying [`normalize`] to each field.
    pub fn from_raw(aggregated: &str, http: &str, https: &str, socks5: &str) -> Self {
        Self {
            aggregated: normalize(aggregated),
            http: normalize(http),
            https: normalize(https),
            socks5: normalize(socks5),
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            aggregated: normalize_optional(self.aggregated),
            http: normalize_optional(self.http),
            https: normalize_optional(self.https),
            socks5: normalize_optional(self.socks5),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aggregated.is_none()
            && self.http.is_none()
            && self.https.is_none()
            && self.socks5.is_none()
    }
}

/// JSON-backed persistence for [`ProxyConfig`].
#[derive(Debug, Clone)]
pub struct ProxyStore {
    path: PathBuf,
}

impl ProxyStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store rooted in the tokbar data directory (`proxy.json`).
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("proxy.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored config.
    ///
    /// Never fails: a missing or unreadable file yields an empty config.
    pub fn load(&self) -> ProxyConfig {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(_) => return ProxyConfig::default(),
        };

        match serde_json::from_str::<ProxyConfig>(&body) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed proxy config {}: {}",
                    self.path.display(),
                    e
                );
                ProxyConfig::default()
            }
        }
    }

    /// Normalizes and writes the config, creating the parent directory.
    ///
    /// # Errors
    /// - If the parent directory cannot be created
    /// - If the file cannot be written
    pub fn save(&self, config: ProxyConfig) -> anyhow::Result<ProxyConfig> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid proxy config path"))?;

        let config = config.normalized();
        let body = serde_json::to_string_pretty(&config)?;

        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", parent.display()))?;
        fs::write(&self.path, body)
            .map_err(|e| anyhow::anyhow!("Failed to write proxy config: {e}"))?;

        tracing::info!("Proxy configuration saved to {}", self.path.display());
        Ok(config)
    }
}
