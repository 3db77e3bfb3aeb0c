//! Interactive settings screen.
//!
//! Mounts the view named by the start-up selector and runs it in the terminal.

use crate::backend::LocalBackend;
use crate::config::TokbarConfig;
use crate::ui::terminal::SettingsTui;
use crate::ui::Document;
use crate::views::{self, PROXY_VIEW, RIGHTCODES_LOGIN_VIEW};

/// Shows the selected settings view.
///
/// An unknown or missing selector mounts nothing and returns immediately.
///
/// # Errors
/// - If the settings file is malformed
/// - If the mount container is missing
/// - If the terminal cannot be driven
pub async fn handle_settings(view: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== tokbar settings (view={:?}) ===", view);

    let mut document = Document::with_mount_point();
    let Some(mounted) = views::mount(&mut document, view.as_deref())? else {
        println!(
            "Nothing to show. Use --view {PROXY_VIEW} or --view {RIGHTCODES_LOGIN_VIEW}."
        );
        return Ok(());
    };

    let config = TokbarConfig::load()?;
    let backend = LocalBackend::new(&config)?;

    let mut tui = SettingsTui::new()?;
    let result = tui.run(&mut document, mounted, &backend).await;
    tui.cleanup()?;

    tracing::debug!("Settings screen closed");
    result
}
