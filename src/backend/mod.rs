//! Operations the settings views invoke.
//!
//! Each operation is an explicit request/response pair. Views never call a
//! [`Backend`] directly: they emit a [`Request`], the caller runs it through
//! [`dispatch`] and hands the [`Response`] back to the view.

pub mod local;

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::config::{ProxyConfig, StoredIn};

pub use local::LocalBackend;

/// Result of saving a proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySaveResult {
    /// Whether the pricing endpoint is reachable with the saved configuration
    pub available: bool,
    pub last_error: Option<String>,
}

/// Result of a successful credential exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightcodesLoginResult {
    pub stored_in: StoredIn,
}

/// Username/password pair, alive only for the duration of one exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failure of a backend call; the text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{0}")]
    Rejected(String),
    #[error("Request did not complete: {0}")]
    Transport(String),
}

/// Remote operations available to the settings views.
pub trait Backend: Clone + Send + Sync + 'static {
    fn get_proxy_config(&self) -> impl Future<Output = Result<ProxyConfig, BackendError>> + Send;

    fn set_proxy_config(
        &self,
        config: ProxyConfig,
    ) -> impl Future<Output = Result<ProxySaveResult, BackendError>> + Send;

    fn rightcodes_login(
        &self,
        credential: Credential,
    ) -> impl Future<Output = Result<RightcodesLoginResult, BackendError>> + Send;
}

/// A pending backend call emitted by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    GetProxyConfig,
    SetProxyConfig(ProxyConfig),
    RightcodesLogin(Credential),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::GetProxyConfig => RequestKind::GetProxyConfig,
            Self::SetProxyConfig(_) => RequestKind::SetProxyConfig,
            Self::RightcodesLogin(_) => RequestKind::RightcodesLogin,
        }
    }
}

/// Payload-free tag of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    GetProxyConfig,
    SetProxyConfig,
    RightcodesLogin,
}

impl RequestKind {
    /// Failed response of the matching shape, for requests that never resolved.
    pub fn failed(self, error: BackendError) -> Response {
        match self {
            Self::GetProxyConfig => Response::ProxyConfig(Err(error)),
            Self::SetProxyConfig => Response::ProxySaved(Err(error)),
            Self::RightcodesLogin => Response::RightcodesLogin(Err(error)),
        }
    }
}

/// The resolution of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ProxyConfig(Result<ProxyConfig, BackendError>),
    ProxySaved(Result<ProxySaveResult, BackendError>),
    RightcodesLogin(Result<RightcodesLoginResult, BackendError>),
}

/// Runs a request against the backend.
pub async fn dispatch<B: Backend>(backend: &B, request: Request) -> Response {
    match request {
        Request::GetProxyConfig => Response::ProxyConfig(backend.get_proxy_config().await),
        Request::SetProxyConfig(config) => {
            Response::ProxySaved(backend.set_proxy_config(config).await)
        }
        Request::RightcodesLogin(credential) => {
            Response::RightcodesLogin(backend.rightcodes_login(credential).await)
        }
    }
}
