//! Command handlers for tokbar-settings.
//!
//! Each submodule handles one command.
//!
//! # Commands
//! - `settings`: Full-screen settings view (default)
//! - `login`: Prompt-driven Right.codes login
//! - `status`: Print stored proxy settings and token tier
//! - `logs`: Display recent log entries

pub mod login;
pub mod logs;
pub mod settings;
pub mod status;

pub use login::handle_login;
pub use logs::handle_logs;
pub use settings::handle_settings;
pub use status::handle_status;
