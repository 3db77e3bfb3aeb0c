//! In-process backend: proxy file, pricing probe, Right.codes login and token storage.

use std::sync::Arc;

use crate::backend::{
    Backend, BackendError, Credential, ProxySaveResult, RightcodesLoginResult,
};
use crate::config::{ProxyConfig, ProxyStore, TokbarConfig, TokenStore};
use crate::pricing::PricingProbe;
use crate::rightcodes::RightcodesApiClient;

struct Inner {
    proxy_store: ProxyStore,
    token_store: TokenStore,
    probe: PricingProbe,
    rightcodes: RightcodesApiClient,
}

/// Backend that performs every operation on this machine.
#[derive(Clone)]
pub struct LocalBackend {
    inner: Arc<Inner>,
}

impl LocalBackend {
    /// # Errors
    /// - If the data directory cannot be resolved
    /// - If the HTTP client cannot be built
    pub fn new(config: &TokbarConfig) -> anyhow::Result<Self> {
        let data_dir = config.data_dir()?;
        Ok(Self::from_parts(
            ProxyStore::in_dir(&data_dir),
            TokenStore::in_dir(&data_dir, config.storage.use_keyring),
            PricingProbe::new(config.pricing.clone()),
            RightcodesApiClient::new(&config.rightcodes)?,
        ))
    }

    pub fn from_parts(
        proxy_store: ProxyStore,
        token_store: TokenStore,
        probe: PricingProbe,
        rightcodes: RightcodesApiClient,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                proxy_store,
                token_store,
                probe,
                rightcodes,
            }),
        }
    }

    #[cfg(test)]
    pub fn proxy_store(&self) -> &ProxyStore {
        &self.inner.proxy_store
    }

    #[cfg(test)]
    pub fn token_store(&self) -> &TokenStore {
        &self.inner.token_store
    }
}

impl Backend for LocalBackend {
    async fn get_proxy_config(&self) -> Result<ProxyConfig, BackendError> {
        Ok(self.inner.proxy_store.load())
    }

    async fn set_proxy_config(&self, config: ProxyConfig) -> Result<ProxySaveResult, BackendError> {
        let saved = self
            .inner
            .proxy_store
            .save(config)
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        let availability = self.inner.probe.check(&saved).await;
        Ok(ProxySaveResult {
            available: availability.available,
            last_error: availability.last_error,
        })
    }

    async fn rightcodes_login(
        &self,
        credential: Credential,
    ) -> Result<RightcodesLoginResult, BackendError> {
        let username = credential.username.trim();
        if username.is_empty() || credential.password.is_empty() {
            return Err(BackendError::Rejected(
                "Enter a username and password.".to_string(),
            ));
        }

        let token = self
            .inner
            .rightcodes
            .login(username, &credential.password)
            .await
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        let store = self.inner.token_store.clone();
        let stored_in = tokio::task::spawn_blocking(move || store.save_token(&token))
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?
            .map_err(|e| BackendError::Rejected(format!("Failed to save token: {e}")))?;

        tracing::info!("Right.codes login succeeded, token stored in {}", stored_in);
        Ok(RightcodesLoginResult { stored_in })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::{PricingConfig, RightcodesConfig};
    use crate::config::StoredIn;
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(dir: &Path, server: &MockServer) -> LocalBackend {
        LocalBackend::from_parts(
            ProxyStore::in_dir(dir),
            TokenStore::in_dir(dir, false),
            PricingProbe::new(PricingConfig {
                url: format!("{}/prices.json", server.uri()),
                connect_timeout_secs: 1,
                timeout_secs: 2,
            }),
            RightcodesApiClient::new(&RightcodesConfig {
                base_url: server.uri(),
                connect_timeout_secs: 1,
                timeout_secs: 2,
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn saved_proxy_is_returned_on_next_load() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), &server);

        let result = backend
            .set_proxy_config(ProxyConfig::from_raw("", "", "", ""))
            .await
            .unwrap();
        assert!(result.available);

        let stored = ProxyConfig {
            socks5: Some("127.0.0.1:1080".to_string()),
            ..ProxyConfig::default()
        };
        backend.proxy_store().save(stored.clone()).unwrap();
        assert_eq!(backend.get_proxy_config().await.unwrap(), stored);
    }

    #[tokio::test]
    async fn unreachable_proxy_reports_unavailable() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), &server);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = backend
            .set_proxy_config(ProxyConfig {
                aggregated: Some(format!("127.0.0.1:{port}")),
                ..ProxyConfig::default()
            })
            .await
            .unwrap();
        assert!(!result.available);
        assert!(result.last_error.is_some());
        assert_eq!(
            backend.get_proxy_config().await.unwrap().aggregated,
            Some(format!("127.0.0.1:{port}"))
        );
    }

    #[tokio::test]
    async fn login_stores_token_in_file_tier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userToken": "tok-9"})))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), &server);

        let result = backend
            .rightcodes_login(Credential {
                username: "  alice ".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.stored_in, StoredIn::File);
        assert_eq!(
            backend.token_store().load_token(),
            Some(("tok-9".to_string(), StoredIn::File))
        );
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), &server);

        let err = backend
            .rightcodes_login(Credential {
                username: "   ".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::Rejected("Enter a username and password.".to_string())
        );

        let err = backend
            .rightcodes_login(Credential {
                username: "alice".to_string(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
        assert_eq!(backend.token_store().load_token(), None);
    }

    #[tokio::test]
    async fn auth_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), &server);

        let err = backend
            .rightcodes_login(Credential {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Authentication failed"));
    }
}
