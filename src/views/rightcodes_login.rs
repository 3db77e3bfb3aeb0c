//! Right.codes sign-in view.
//!
//! Exchanges a username and password for a user token. Credentials are always
//! entered fresh and live only in the input widgets; on success the password
//! input is wiped and the status names the storage tier that received the token.

use crate::backend::{BackendError, Credential, Request, Response, RightcodesLoginResult};
use crate::ui::{ButtonHandle, FieldHandle, StatusHandle, Surface, Tone, UiEvent};
use crate::views::field::{labeled_input, FieldSpec};

pub const USERNAME_ID: &str = "rightcodes-username";
pub const PASSWORD_ID: &str = "rightcodes-password";
pub const LOGIN_ID: &str = "rightcodes-login";

pub struct RightcodesLoginView {
    username: FieldHandle,
    password: FieldHandle,
    login: ButtonHandle,
    status: StatusHandle,
}

impl RightcodesLoginView {
    pub fn mount<S: Surface>(surface: &mut S) -> Self {
        surface.clear();

        let username = labeled_input(
            surface,
            FieldSpec::text("Username", USERNAME_ID, "Right.codes username or email"),
        );
        let password = labeled_input(
            surface,
            FieldSpec::masked("Password", PASSWORD_ID, "Password (never stored)"),
        );
        let login = surface.append_button(LOGIN_ID, "Log in");
        let status = surface.append_status();

        Self {
            username,
            password,
            login,
            status,
        }
    }

    pub fn handle<S: Surface>(&mut self, surface: &mut S, event: UiEvent) -> Option<Request> {
        match event {
            UiEvent::Activate(button) if button == self.login => self.submit(surface),
            UiEvent::Commit(field) if field == self.password => self.submit(surface),
            _ => None,
        }
    }

    fn submit<S: Surface>(&self, surface: &mut S) -> Option<Request> {
        if !surface.is_enabled(self.login) {
            return None;
        }
        surface.set_enabled(self.login, false);
        surface.set_status(self.status, Tone::Pending, "Logging in…");

        tracing::info!("Submitting Right.codes login");
        Some(Request::RightcodesLogin(Credential {
            username: surface.value(self.username).to_string(),
            password: surface.value(self.password).to_string(),
        }))
    }

    pub fn complete<S: Surface>(&mut self, surface: &mut S, response: Response) {
        match response {
            Response::RightcodesLogin(result) => self.finish_login(surface, result),
            other => tracing::warn!("Login view ignoring unexpected response: {:?}", other),
        }
        surface.set_enabled(self.login, true);
    }

    fn finish_login<S: Surface>(
        &self,
        surface: &mut S,
        result: Result<RightcodesLoginResult, BackendError>,
    ) {
        match result {
            Ok(RightcodesLoginResult { stored_in }) => {
                surface.set_value(self.password, "");
                surface.set_status(
                    self.status,
                    Tone::Success,
                    &format!("Logged in. Token stored in {stored_in}."),
                );
            }
            Err(e) => {
                tracing::warn!("Right.codes login failed: {}", e);
                surface.set_status(self.status, Tone::Error, &format!("Login failed: {e}"));
            }
        }
    }
}
