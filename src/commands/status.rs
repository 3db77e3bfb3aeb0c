//! Print the stored proxy configuration, token tier and Right.codes quota.

use crate::config::{ProxyConfig, ProxyStore, StoredIn, TokbarConfig, TokenStore};
use crate::rightcodes::{summarize_subscription, RightcodesApiClient};

const NOT_LOGGED_IN: &str = "rc: not logged in (run `tokbar-settings login`)";

/// Prints each proxy field, where the Right.codes token lives and the current quota.
///
/// # Errors
/// - If the settings file is malformed
/// - If the data directory cannot be determined
/// - If the HTTP client cannot be built
pub async fn handle_status() -> Result<(), anyhow::Error> {
    let config = TokbarConfig::load()?;
    let data_dir = config.data_dir()?;

    let proxy_store = ProxyStore::in_dir(&data_dir);
    let proxy = proxy_store.load();
    tracing::debug!("Loaded proxy settings from {}", proxy_store.path().display());

    println!("Proxy settings ({}):", proxy_store.path().display());
    if proxy.is_empty() {
        println!("  No proxy configured; pricing requests go direct.");
    } else {
        for (name, value) in proxy_lines(&proxy) {
            println!("  {name:<11} {value}");
        }
    }

    let token_store = TokenStore::in_dir(&data_dir, config.storage.use_keyring);
    println!();
    println!("Right.codes token: {}", token_line(&token_store));

    let quota = match token_store.load_token() {
        Some((token, _)) => {
            let client = RightcodesApiClient::new(&config.rightcodes)?;
            quota_line(&client, &token).await
        }
        None => NOT_LOGGED_IN.to_string(),
    };
    println!("Right.codes quota: {quota}");

    Ok(())
}

async fn quota_line(client: &RightcodesApiClient, token: &str) -> String {
    match client.list_subscriptions(token).await {
        Ok(payload) => match summarize_subscription(&payload) {
            Some(summary) => summary.to_string(),
            None => {
                tracing::warn!("Subscription payload has no usable quota");
                "rc: subscription data missing (cannot compute quota)".to_string()
            }
        },
        Err(e) => e.quota_text(),
    }
}

fn show(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("not set")
}

fn proxy_lines(proxy: &ProxyConfig) -> [(&'static str, &str); 4] {
    [
        ("aggregated", show(&proxy.aggregated)),
        ("http", show(&proxy.http)),
        ("https", show(&proxy.https)),
        ("socks5", show(&proxy.socks5)),
    ]
}

fn token_line(store: &TokenStore) -> String {
    match store.load_token() {
        Some((_, StoredIn::File)) => format!("stored in file ({})", store.file_path().display()),
        Some((_, tier)) => format!("stored in {tier}"),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::RightcodesConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn unset_fields_read_not_set() {
        let proxy = ProxyConfig {
            https: Some("https://proxy:8443".to_string()),
            ..ProxyConfig::default()
        };
        let lines = proxy_lines(&proxy);
        assert_eq!(lines[0], ("aggregated", "not set"));
        assert_eq!(lines[2], ("https", "https://proxy:8443"));
        assert_eq!(lines[3], ("socks5", "not set"));
    }

    #[test]
    fn token_line_names_tier_without_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::in_dir(dir.path(), false);
        assert_eq!(token_line(&store), "none");

        store.save_token("secret-token").unwrap();
        let line = token_line(&store);
        assert!(line.starts_with("stored in file ("));
        assert!(!line.contains("secret-token"));
    }

    async fn client_for(server: &MockServer) -> RightcodesApiClient {
        RightcodesApiClient::new(&RightcodesConfig {
            base_url: server.uri(),
            connect_timeout_secs: 1,
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn quota_line_summarizes_subscription() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subscriptions": [
                    {"total_quota": "12345", "remaining_quota": 12000.5, "reset_today": false}
                ]
            })))
            .mount(&server)
            .await;

        let line = quota_line(&client_for(&server).await, "tok-1").await;
        assert_eq!(line, "rc $344.50000/$12,345 NR");
    }

    #[tokio::test]
    async fn quota_line_reports_rejected_token_without_leaking_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let line = quota_line(&client_for(&server).await, "tok-secret").await;
        assert_eq!(line, "rc: authentication failed (log in again)");
        assert!(!line.contains("tok-secret"));
    }

    #[tokio::test]
    async fn quota_line_flags_payload_without_quota() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"subscriptions": []})))
            .mount(&server)
            .await;

        let line = quota_line(&client_for(&server).await, "tok-1").await;
        assert!(line.contains("subscription data missing"));
    }
}
