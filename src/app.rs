//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// Terminal settings screens for tokbar: proxy configuration and Right.codes login
#[derive(Parser)]
#[command(name = "tokbar-settings")]
#[command(version)]
#[command(about = "Terminal settings screens for tokbar")]
#[command(long_about = "Terminal settings screens for tokbar.\n\nDEFAULT COMMAND:\n    Without a command, the view named by --view is shown. An unknown or\n    missing view shows nothing.\n\nEXAMPLES:\n    # Edit the pricing proxy settings\n    $ tokbar-settings --view proxy\n\n    # Log in to Right.codes\n    $ tokbar-settings --view rightcodes_login\n\n    # Log in without the full-screen view\n    $ tokbar-settings login\n\n    # Show what is stored\n    $ tokbar-settings status")]
#[command(
    after_help = "CONFIGURATION:\n    Settings file:      ~/.config/tokbar/settings.toml\n    Data directory:     ~/.tokbar\n    Logs:               ~/.local/state/tokbar/tokbar-settings.log.*"
)]
struct Cli {
    /// View to show: `proxy` or `rightcodes_login`
    #[arg(long, value_name = "NAME", global = true)]
    view: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to Right.codes from the prompt
    ///
    /// Asks for a username and password, exchanges them for a token and
    /// stores the token in the keyring or the local token file.
    Login,

    /// Show stored proxy settings, the token tier and the Right.codes quota
    ///
    /// The token itself is never printed.
    #[command(visible_alias = "s")]
    Status,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   tokbar-settings completions bash > tokbar-settings.bash
    ///   tokbar-settings completions zsh > _tokbar-settings
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "tokbar-settings", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None => {
            commands::handle_settings(cli.view).await?;
        }
        Some(Commands::Login) => {
            if let Err(e) = commands::handle_login().await {
                // cliclack already displayed the cancellation
                let err_msg = e.to_string();
                if err_msg.contains("cancelled") || err_msg.contains("interrupted") {
                    process::exit(0);
                }
                return Err(e);
            }
        }
        Some(Commands::Status) => {
            commands::handle_status().await?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn view_selector_parses_without_subcommand() {
        let cli = Cli::try_parse_from(["tokbar-settings", "--view", "proxy"]).unwrap();
        assert_eq!(cli.view.as_deref(), Some("proxy"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["tokbar-settings", "status"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));

        let cli = Cli::try_parse_from(["tokbar-settings", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));
    }
}
