//! Configuration management for tokbar-settings.
//!
//! This module handles the settings file (TOML, user config directory), the pricing
//! proxy configuration (JSON, tokbar data directory) and the tiered Right.codes token
//! store (OS keyring with a local file fallback).

pub mod file;
pub mod proxy;
pub mod secrets;

pub use file::TokbarConfig;
pub use proxy::{ProxyConfig, ProxyStore};
pub use secrets::{StoredIn, TokenStore};
