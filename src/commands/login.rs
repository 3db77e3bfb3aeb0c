//! Prompt-driven Right.codes login.
//!
//! Same exchange as the `rightcodes_login` view, for hosts without a usable
//! full-screen terminal. The password is read masked and dropped after the call.

use cliclack::{input, intro, outro, password, spinner};
use console::style;

use crate::backend::{Backend, Credential, LocalBackend};
use crate::config::TokbarConfig;

/// Asks for a username and password and exchanges them for a token.
///
/// # Errors
/// - If a prompt is cancelled
/// - If the settings file is malformed
/// - If the exchange or token storage fails
pub async fn handle_login() -> Result<(), anyhow::Error> {
    tracing::info!("=== tokbar Right.codes login ===");

    ctrlc::set_handler(move || {})
        .map_err(|e| anyhow::anyhow!("Failed to set Ctrl-C handler: {e}"))?;

    intro(style(" Right.codes login ").on_white().black())?;

    let username: String = input("Username")
        .placeholder("Right.codes username or email")
        .validate(|value: &String| check_username(value))
        .interact()
        .map_err(|e| anyhow::anyhow!("Username input cancelled: {e}"))?;

    let password: String = password("Password")
        .validate(|value: &String| check_password(value))
        .interact()
        .map_err(|e| anyhow::anyhow!("Password input cancelled: {e}"))?;

    let config = TokbarConfig::load()?;
    let backend = LocalBackend::new(&config)?;

    let progress = spinner();
    progress.start("Logging in…");
    let result = backend
        .rightcodes_login(Credential { username, password })
        .await;

    match result {
        Ok(login) => {
            progress.stop(format!("Token stored in {}", login.stored_in));
            outro("✅ Logged in.")?;
            Ok(())
        }
        Err(e) => {
            progress.error(format!("Login failed: {e}"));
            Err(anyhow::anyhow!("Login failed: {e}"))
        }
    }
}

/// Surrounding whitespace is trimmed before the exchange, so a blank username is empty.
fn check_username(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err("Username cannot be empty")
    } else {
        Ok(())
    }
}

/// Passwords are sent verbatim; only the empty string is refused.
fn check_password(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        Err("Password cannot be empty")
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_username_is_refused() {
        assert!(check_username("").is_err());
        assert!(check_username("   ").is_err());
        assert!(check_username(" alice ").is_ok());
    }

    #[test]
    fn whitespace_password_is_accepted() {
        assert!(check_password("").is_err());
        assert!(check_password("   ").is_ok());
        assert!(check_password("hunter2").is_ok());
    }
}
