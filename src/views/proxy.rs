//! Pricing proxy settings view.
//!
//! Four optional endpoints with Save and Clear. The stored configuration is fetched
//! on mount and written back only on Save; Clear touches the inputs alone.

use crate::backend::{ProxySaveResult, Request, Response};
use crate::config::ProxyConfig;
use crate::ui::{ButtonHandle, FieldHandle, StatusHandle, Surface, Tone, UiEvent};
use crate::views::field::{labeled_input, FieldSpec};

pub const AGGREGATED_ID: &str = "proxy-aggregated";
pub const HTTP_ID: &str = "proxy-http";
pub const HTTPS_ID: &str = "proxy-https";
pub const SOCKS5_ID: &str = "proxy-socks5";
pub const SAVE_ID: &str = "proxy-save";
pub const CLEAR_ID: &str = "proxy-clear";

const UNAVAILABLE_HINT: &str = "Pricing endpoint unreachable: check proxy availability.";

pub struct ProxyView {
    aggregated: FieldHandle,
    http: FieldHandle,
    https: FieldHandle,
    socks5: FieldHandle,
    save: ButtonHandle,
    clear: ButtonHandle,
    status: StatusHandle,
    loading: bool,
}

impl ProxyView {
    /// Builds the form and returns the request that loads the stored configuration.
    ///
    /// Save and Clear stay disabled until the load resolves.
    pub fn mount<S: Surface>(surface: &mut S) -> (Self, Request) {
        surface.clear();

        let aggregated = labeled_input(
            surface,
            FieldSpec::text("Aggregated proxy (all protocols)", AGGREGATED_ID, "127.0.0.1:7897"),
        );
        let http = labeled_input(
            surface,
            FieldSpec::text("HTTP proxy", HTTP_ID, "http://127.0.0.1:7897"),
        );
        let https = labeled_input(
            surface,
            FieldSpec::text("HTTPS proxy", HTTPS_ID, "http://127.0.0.1:7897"),
        );
        let socks5 = labeled_input(
            surface,
            FieldSpec::text("SOCKS5 proxy", SOCKS5_ID, "socks5://127.0.0.1:7898"),
        );
        let save = surface.append_button(SAVE_ID, "Save");
        let clear = surface.append_button(CLEAR_ID, "Clear");
        let status = surface.append_status();

        let view = Self {
            aggregated,
            http,
            https,
            socks5,
            save,
            clear,
            status,
            loading: true,
        };
        view.set_busy(surface, true);
        surface.set_status(status, Tone::Pending, "Loading proxy settings…");

        (view, Request::GetProxyConfig)
    }

    /// Inputs are read-only until the stored configuration has arrived.
    pub fn accepts_edits(&self) -> bool {
        !self.loading
    }

    fn set_busy<S: Surface>(&self, surface: &mut S, busy: bool) {
        surface.set_enabled(self.save, !busy);
        surface.set_enabled(self.clear, !busy);
    }

    fn fields(&self) -> [FieldHandle; 4] {
        [self.aggregated, self.http, self.https, self.socks5]
    }

    /// Normalized configuration as currently entered.
    pub fn current_config<S: Surface>(&self, surface: &S) -> ProxyConfig {
        ProxyConfig::from_raw(
            surface.value(self.aggregated),
            surface.value(self.http),
            surface.value(self.https),
            surface.value(self.socks5),
        )
    }

    pub fn handle<S: Surface>(&mut self, surface: &mut S, event: UiEvent) -> Option<Request> {
        match event {
            UiEvent::Activate(button) if button == self.clear => {
                if surface.is_enabled(self.clear) {
                    self.clear_fields(surface);
                }
                None
            }
            UiEvent::Activate(button) if button == self.save => self.begin_save(surface),
            _ => None,
        }
    }

    fn clear_fields<S: Surface>(&self, surface: &mut S) {
        for field in self.fields() {
            surface.set_value(field, "");
        }
        surface.set_status(
            self.status,
            Tone::Info,
            "Fields cleared (not saved yet). Press Save to apply.",
        );
    }

    fn begin_save<S: Surface>(&self, surface: &mut S) -> Option<Request> {
        if !surface.is_enabled(self.save) {
            return None;
        }
        self.set_busy(surface, true);
        surface.set_status(self.status, Tone::Pending, "Saving…");

        let config = self.current_config(surface);
        tracing::info!(
            "Saving proxy settings (aggregated={}, http={}, https={}, socks5={})",
            config.aggregated.is_some(),
            config.http.is_some(),
            config.https.is_some(),
            config.socks5.is_some()
        );
        Some(Request::SetProxyConfig(config))
    }

    pub fn complete<S: Surface>(&mut self, surface: &mut S, response: Response) {
        match response {
            Response::ProxyConfig(result) => {
                self.loading = false;
                self.finish_load(surface, result);
            }
            Response::ProxySaved(result) => self.finish_save(surface, result),
            other => tracing::warn!("Proxy view ignoring unexpected response: {:?}", other),
        }
        self.set_busy(surface, false);
    }

    fn finish_load<S: Surface>(
        &self,
        surface: &mut S,
        result: Result<ProxyConfig, crate::backend::BackendError>,
    ) {
        match result {
            Ok(config) => {
                let values = [config.aggregated, config.http, config.https, config.socks5];
                for (field, value) in self.fields().into_iter().zip(values) {
                    surface.set_value(field, value.as_deref().unwrap_or(""));
                }
                surface.set_status(self.status, Tone::Info, "");
            }
            Err(e) => {
                tracing::error!("Failed to load proxy settings: {}", e);
                surface.set_status(
                    self.status,
                    Tone::Error,
                    &format!("Failed to load proxy settings: {e}"),
                );
            }
        }
    }

    fn finish_save<S: Surface>(
        &self,
        surface: &mut S,
        result: Result<ProxySaveResult, crate::backend::BackendError>,
    ) {
        match result {
            Ok(ProxySaveResult { available: true, .. }) => {
                surface.set_status(
                    self.status,
                    Tone::Success,
                    "Saved. Pricing endpoint is reachable.",
                );
            }
            Ok(ProxySaveResult { last_error, .. }) => {
                let message = match last_error.as_deref().map(str::trim) {
                    Some(detail) if !detail.is_empty() => {
                        format!("Saved, but the pricing endpoint is unreachable: {detail}")
                    }
                    _ => format!("Saved. {UNAVAILABLE_HINT}"),
                };
                surface.set_status(self.status, Tone::Error, &message);
            }
            Err(e) => {
                tracing::error!("Saving proxy settings failed: {}", e);
                surface.set_status(self.status, Tone::Error, &format!("Save failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::backend::{dispatch, BackendError};
    use crate::ui::{Container, Surface};

    fn mounted(stored: ProxyConfig) -> (ProxyView, Container, FakeBackend, Request) {
        let mut c = Container::new("app");
        let (view, load) = ProxyView::mount(&mut c);
        (view, c, FakeBackend::with_stored(stored), load)
    }

    async fn loaded(stored: ProxyConfig) -> (ProxyView, Container, FakeBackend) {
        let (mut view, mut c, backend, load) = mounted(stored);
        let response = dispatch(&backend, load).await;
        view.complete(&mut c, response);
        (view, c, backend)
    }

    fn value(c: &Container, id: &str) -> String {
        c.value(c.find_field(id).unwrap()).to_string()
    }

    fn set(c: &mut Container, id: &str, text: &str) {
        let field = c.find_field(id).unwrap();
        c.set_value(field, text);
    }

    fn click(view: &mut ProxyView, c: &mut Container, id: &str) -> Option<Request> {
        let button = c.find_button(id).unwrap();
        view.handle(c, UiEvent::Activate(button))
    }

    fn enabled(c: &Container, id: &str) -> bool {
        c.is_enabled(c.find_button(id).unwrap())
    }

    #[tokio::test]
    async fn load_populates_all_fields_at_once() {
        let (view, mut c, backend, load) = mounted(ProxyConfig {
            aggregated: Some("127.0.0.1:7897".to_string()),
            socks5: Some("socks5://127.0.0.1:1080".to_string()),
            ..ProxyConfig::default()
        });
        assert_eq!(load, Request::GetProxyConfig);
        assert!(!enabled(&c, SAVE_ID));
        assert_eq!(value(&c, AGGREGATED_ID), "");

        let mut view = view;
        let response = dispatch(&backend, load).await;
        view.complete(&mut c, response);

        assert_eq!(value(&c, AGGREGATED_ID), "127.0.0.1:7897");
        assert_eq!(value(&c, HTTP_ID), "");
        assert_eq!(value(&c, HTTPS_ID), "");
        assert_eq!(value(&c, SOCKS5_ID), "socks5://127.0.0.1:1080");
        assert!(enabled(&c, SAVE_ID));
        assert!(enabled(&c, CLEAR_ID));
    }

    #[tokio::test]
    async fn load_failure_is_shown_and_controls_unlock() {
        let (mut view, mut c, _backend, _load) = mounted(ProxyConfig::default());
        view.complete(
            &mut c,
            Response::ProxyConfig(Err(BackendError::Transport("ipc closed".to_string()))),
        );
        let (text, tone) = c.status().unwrap();
        assert_eq!(tone, Tone::Error);
        assert!(text.contains("ipc closed"));
        assert!(enabled(&c, SAVE_ID));
        assert!(view.accepts_edits());
    }

    #[tokio::test]
    async fn inputs_read_only_until_load_resolves() {
        let (mut view, mut c, backend, load) = mounted(ProxyConfig::default());
        assert!(!view.accepts_edits());

        let response = dispatch(&backend, load).await;
        view.complete(&mut c, response);
        assert!(view.accepts_edits());

        click(&mut view, &mut c, SAVE_ID).unwrap();
        assert!(view.accepts_edits());
    }

    #[tokio::test]
    async fn save_transmits_blank_fields_as_absent() {
        let (mut view, mut c, backend) = loaded(ProxyConfig::default()).await;
        set(&mut c, AGGREGATED_ID, "127.0.0.1:7897");

        let request = click(&mut view, &mut c, SAVE_ID).unwrap();
        assert_eq!(
            request,
            Request::SetProxyConfig(ProxyConfig {
                aggregated: Some("127.0.0.1:7897".to_string()),
                http: None,
                https: None,
                socks5: None,
            })
        );

        let response = dispatch(&backend, request).await;
        view.complete(&mut c, response);
        assert_eq!(backend.saves()[0].http, None);
        assert_eq!(c.status().unwrap().1, Tone::Success);
    }

    #[tokio::test]
    async fn every_field_survives_save_and_reload() {
        for id in [AGGREGATED_ID, HTTP_ID, HTTPS_ID, SOCKS5_ID] {
            let (mut view, mut c, backend) = loaded(ProxyConfig::default()).await;
            set(&mut c, id, "  10.0.0.1:3128 ");

            let request = click(&mut view, &mut c, SAVE_ID).unwrap();
            let response = dispatch(&backend, request).await;
            view.complete(&mut c, response);

            let mut remount = Container::new("app");
            let (mut reloaded, load) = ProxyView::mount(&mut remount);
            let response = dispatch(&backend, load).await;
            reloaded.complete(&mut remount, response);

            assert_eq!(value(&remount, id), "10.0.0.1:3128", "field {id}");
        }
    }

    #[tokio::test]
    async fn clear_blanks_fields_without_saving() {
        let (mut view, mut c, backend) = loaded(ProxyConfig {
            aggregated: Some("a:1".to_string()),
            http: Some("h:2".to_string()),
            https: Some("s:3".to_string()),
            socks5: Some("5:4".to_string()),
        })
        .await;

        assert_eq!(click(&mut view, &mut c, CLEAR_ID), None);

        for id in [AGGREGATED_ID, HTTP_ID, HTTPS_ID, SOCKS5_ID] {
            assert_eq!(value(&c, id), "");
        }
        assert_eq!(c.status().unwrap().1, Tone::Info);
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn controls_locked_while_saving() {
        let (mut view, mut c, backend) = loaded(ProxyConfig::default()).await;

        let request = click(&mut view, &mut c, SAVE_ID).unwrap();
        assert!(!enabled(&c, SAVE_ID));
        assert!(!enabled(&c, CLEAR_ID));

        assert_eq!(click(&mut view, &mut c, SAVE_ID), None);
        set(&mut c, HTTP_ID, "kept");
        assert_eq!(click(&mut view, &mut c, CLEAR_ID), None);
        assert_eq!(value(&c, HTTP_ID), "kept");

        backend.queue_save_result(Err(BackendError::Transport("boom".to_string())));
        let response = dispatch(&backend, request).await;
        view.complete(&mut c, response);

        assert!(enabled(&c, SAVE_ID));
        assert!(enabled(&c, CLEAR_ID));
        assert_eq!(backend.saves().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_with_detail_shows_detail() {
        let (mut view, mut c, _backend) = loaded(ProxyConfig::default()).await;
        let _ = click(&mut view, &mut c, SAVE_ID);
        view.complete(
            &mut c,
            Response::ProxySaved(Ok(ProxySaveResult {
                available: false,
                last_error: Some("connect timeout".to_string()),
            })),
        );
        let (text, tone) = c.status().unwrap();
        assert_eq!(tone, Tone::Error);
        assert!(text.contains("connect timeout"));
    }

    #[tokio::test]
    async fn unavailable_without_detail_falls_back_to_hint() {
        for last_error in [None, Some("   ".to_string())] {
            let (mut view, mut c, _backend) = loaded(ProxyConfig::default()).await;
            let _ = click(&mut view, &mut c, SAVE_ID);
            view.complete(
                &mut c,
                Response::ProxySaved(Ok(ProxySaveResult {
                    available: false,
                    last_error,
                })),
            );
            let (text, tone) = c.status().unwrap();
            assert_eq!(tone, Tone::Error);
            assert!(text.contains(UNAVAILABLE_HINT));
        }
    }

    #[tokio::test]
    async fn transport_failure_is_embedded_in_status() {
        let (mut view, mut c, _backend) = loaded(ProxyConfig::default()).await;
        let _ = click(&mut view, &mut c, SAVE_ID);
        view.complete(
            &mut c,
            Response::ProxySaved(Err(BackendError::Rejected("disk full".to_string()))),
        );
        let (text, tone) = c.status().unwrap();
        assert_eq!(tone, Tone::Error);
        assert!(text.contains("disk full"));
    }
}
