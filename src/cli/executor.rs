//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use anyhow::anyhow;

use super::handlers::{SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;

/// Execute a CLI command with the given settings
///
/// Running without a subcommand behaves like `serve`.
///
/// # Errors
/// Returns argument validation failures and errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    cli.validate().map_err(|msg| anyhow!(msg))?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Send(args)) => SendCommandHandler::new(&settings)?.execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["courier-rs", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, Settings::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_rejects_blank_message() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "slack",
            "--webhook-url",
            "u",
            "--message",
            " ",
        ])
        .unwrap();
        let err = execute_command(&cli, Settings::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Message cannot be empty");
    }

    #[tokio::test]
    async fn test_execute_send_rejects_invalid_fields() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "teams",
            "--webhook-url",
            "https://example.com",
            "--message",
            "hi",
        ])
        .unwrap();
        let err = execute_command(&cli, Settings::default()).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported platform: teams"));
    }
}
