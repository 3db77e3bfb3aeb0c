//! Minimal Right.codes HTTP client: credential exchange and subscription listing.
//!
//! Errors carry displayable text and never include the username, password or token.

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::file::RightcodesConfig;

/// Right.codes API failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RightcodesApiError {
    /// DNS, connect, timeout or dropped connection
    #[error("Network error: check your connection and try again.")]
    Network,
    /// 401 or 403
    #[error("Authentication failed: check your username and password.")]
    Auth,
    /// 429, optionally with a `Retry-After` delay in seconds
    #[error("{}", rate_limited_text(*retry_after_seconds))]
    RateLimited { retry_after_seconds: Option<u64> },
    /// Any other non-2xx status
    #[error("Login failed: server returned HTTP {0}.")]
    HttpStatus(u16),
    /// Body is not JSON or has no usable token
    #[error("Login failed: unexpected response from server.")]
    BadPayload,
}

impl RightcodesApiError {
    /// One-line quota status shown in place of a summary.
    pub fn quota_text(&self) -> String {
        match self {
            Self::Network => "rc: network error (check your connection)".to_string(),
            Self::Auth => "rc: authentication failed (log in again)".to_string(),
            Self::RateLimited {
                retry_after_seconds: Some(s),
            } => format!("rc: rate limited (429), retry in {s}s"),
            Self::RateLimited {
                retry_after_seconds: None,
            } => "rc: rate limited (429), try again later".to_string(),
            Self::HttpStatus(code) => format!("rc: API error (HTTP {code})"),
            Self::BadPayload => "rc: unexpected API response".to_string(),
        }
    }
}

fn rate_limited_text(retry_after_seconds: Option<u64>) -> String {
    match retry_after_seconds {
        Some(s) => format!("Rate limited (429): retry in {s}s."),
        None => "Rate limited (429): try again later.".to_string(),
    }
}

/// Extracts the token from a `/auth/login` payload.
///
/// Accepts `user_token` and `userToken`; blank values are ignored.
fn extract_user_token(payload: &Value) -> Option<String> {
    let obj = payload.as_object()?;
    ["user_token", "userToken"]
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

pub struct RightcodesApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl RightcodesApiClient {
    /// # Errors
    /// - If the HTTP client cannot be built
    pub fn new(settings: &RightcodesConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.timeout())
            .user_agent(concat!("tokbar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Exchanges a username and password for a long-lived user token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, RightcodesApiError> {
        let url = format!("{}/auth/login", self.base_url);

        tracing::debug!(
            "Right.codes API Call:\n  URL: {}\n  Method: POST\n  Body: <redacted credentials>",
            url
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Right.codes login transport error: {}", e.without_url());
                RightcodesApiError::Network
            })?;

        let payload = json_or_error(response).await?;
        extract_user_token(&payload).ok_or(RightcodesApiError::BadPayload)
    }

    /// Fetches the account's subscriptions with a user token.
    pub async fn list_subscriptions(&self, token: &str) -> Result<Value, RightcodesApiError> {
        let url = format!("{}/subscriptions/list", self.base_url);

        tracing::debug!(
            "Right.codes API Call:\n  URL: {}\n  Method: GET\n  Auth: <redacted token>",
            url
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Right.codes subscriptions transport error: {}", e.without_url());
                RightcodesApiError::Network
            })?;

        json_or_error(response).await
    }
}

/// Maps a non-2xx status onto the error taxonomy, otherwise parses the JSON body.
async fn json_or_error(response: reqwest::Response) -> Result<Value, RightcodesApiError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        tracing::warn!("Right.codes API returned HTTP {}", status);
        return Err(match status {
            401 | 403 => RightcodesApiError::Auth,
            429 => RightcodesApiError::RateLimited {
                retry_after_seconds: parse_retry_after_seconds(response.headers()),
            },
            _ => RightcodesApiError::HttpStatus(status),
        });
    }

    response
        .json()
        .await
        .map_err(|_| RightcodesApiError::BadPayload)
}

/// Only the delay-seconds form of `Retry-After` is understood.
fn parse_retry_after_seconds(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let raw = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<u64>().ok()
}
