//! Pricing dataset reachability.
//!
//! After the proxy configuration changes, the pricing URL is probed through the
//! new proxy so the settings view can tell the user whether the fetch will work.

use crate::config::file::PricingConfig;
use crate::config::ProxyConfig;

/// Outcome of a reachability probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingAvailability {
    pub available: bool,
    pub last_error: Option<String>,
}

/// Adds `default_scheme://` when the value carries no scheme of its own.
pub fn proxy_url(raw: &str, default_scheme: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    format!("{default_scheme}://{trimmed}")
}

/// Picks the endpoint used for the HTTPS pricing fetch.
///
/// Order: aggregated, https, http, socks5.
pub fn select_proxy(config: &ProxyConfig) -> Option<String> {
    if let Some(v) = config.aggregated.as_deref() {
        return Some(proxy_url(v, "http"));
    }
    if let Some(v) = config.https.as_deref() {
        return Some(proxy_url(v, "http"));
    }
    if let Some(v) = config.http.as_deref() {
        return Some(proxy_url(v, "http"));
    }
    config.socks5.as_deref().map(|v| proxy_url(v, "socks5"))
}

/// Probes the pricing dataset URL through the configured proxy.
pub struct PricingProbe {
    settings: PricingConfig,
}

impl PricingProbe {
    pub fn new(settings: PricingConfig) -> Self {
        Self { settings }
    }

    fn client_for(&self, proxy: &ProxyConfig) -> Result<reqwest::Client, String> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout())
            .timeout(self.settings.timeout())
            .user_agent(concat!("tokbar/", env!("CARGO_PKG_VERSION")));

        builder = match select_proxy(proxy) {
            Some(url) => {
                tracing::debug!("Pricing probe via proxy {}", url);
                let proxy = reqwest::Proxy::all(&url)
                    .map_err(|e| format!("Invalid proxy address '{url}': {e}"))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))
    }

    /// Issues a `HEAD` request to the pricing URL.
    ///
    /// Never fails: problems are reported through `last_error`.
    pub async fn check(&self, proxy: &ProxyConfig) -> PricingAvailability {
        let result = match self.client_for(proxy) {
            Ok(client) => client
                .head(&self.settings.url)
                .send()
                .await
                .and_then(|resp| resp.error_for_status())
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!("Pricing endpoint reachable");
                PricingAvailability {
                    available: true,
                    last_error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Pricing endpoint unreachable: {}", e);
                PricingAvailability {
                    available: false,
                    last_error: Some(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: String) -> PricingConfig {
        PricingConfig {
            url,
            connect_timeout_secs: 1,
            timeout_secs: 2,
        }
    }

    #[test]
    fn proxy_url_adds_scheme() {
        assert_eq!(proxy_url("127.0.0.1:7897", "http"), "http://127.0.0.1:7897");
        assert_eq!(
            proxy_url("socks5://127.0.0.1:7897", "http"),
            "socks5://127.0.0.1:7897"
        );
    }

    #[test]
    fn aggregated_wins_then_https_http_socks5() {
        let mut config = ProxyConfig {
            aggregated: Some("agg:1".to_string()),
            http: Some("http:2".to_string()),
            https: Some("https:3".to_string()),
            socks5: Some("socks:4".to_string()),
        };
        assert_eq!(select_proxy(&config).as_deref(), Some("http://agg:1"));

        config.aggregated = None;
        assert_eq!(select_proxy(&config).as_deref(), Some("http://https:3"));

        config.https = None;
        assert_eq!(select_proxy(&config).as_deref(), Some("http://http:2"));

        config.http = None;
        assert_eq!(select_proxy(&config).as_deref(), Some("socks5://socks:4"));

        config.socks5 = None;
        assert_eq!(select_proxy(&config), None);
    }

    #[tokio::test]
    async fn reachable_without_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = PricingProbe::new(settings(format!("{}/prices.json", server.uri())));
        let result = probe.check(&ProxyConfig::default()).await;
        assert_eq!(result, PricingAvailability { available: true, last_error: None });
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = PricingProbe::new(settings(format!("{}/prices.json", server.uri())));
        let result = probe.check(&ProxyConfig::default()).await;
        assert!(!result.available);
        assert!(result.last_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn dead_proxy_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = PricingProbe::new(settings("http://example.invalid/prices.json".to_string()));
        let proxy = ProxyConfig {
            aggregated: Some(format!("127.0.0.1:{port}")),
            ..ProxyConfig::default()
        };
        let result = probe.check(&proxy).await;
        assert!(!result.available);
        assert!(result.last_error.is_some());
    }
}
