//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::DelayUnit;

/// Schedule chat messages to Slack and Discord webhooks
#[derive(Parser, Debug)]
#[command(name = "courier-rs")]
#[command(about = "Schedule chat messages to Slack and Discord webhooks")]
#[command(long_about = "
Courier sends a single chat message to a Slack or Discord incoming webhook,
either immediately through its HTTP API or after a countdown of up to 3600
seconds, minutes or hours.

EXAMPLES:
    # Start the API server with default configuration
    courier-rs serve

    # Start server on custom host and port
    courier-rs serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    courier-rs --config /path/to/config.toml serve

    # Check configuration without starting server
    courier-rs serve --dry-run

    # Send a Discord message in 30 seconds
    courier-rs send --platform discord \\
        --webhook-url https://discord.com/api/webhooks/123/abc \\
        --message 'Deploy finished' --delay 30

    # Send a Slack message in 5 minutes
    courier-rs send --platform slack --webhook-url $SLACK_WEBHOOK \\
        --message 'Stand-up' --delay 5 --unit minutes

For more information about configuration options, see the documentation.
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load a single TOML file instead of the layered `config/` directory.
    /// `COURIER_*` environment variables still override its values.
    ///
    /// Example: --config /etc/courier/courier.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` overlay is read from the
    /// configuration directory. Ignored together with --config.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Launches the HTTP API. Delayed submissions live in this process; they
    /// are cancelled when the server shuts down.
    ///
    /// Examples:
    ///   courier-rs serve                           # Start with defaults
    ///   courier-rs serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   courier-rs serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept connections
        /// from any interface.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides both configuration file settings and global --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Returns exit code 0 if valid, non-zero if invalid.
        #[arg(long)]
        dry_run: bool,
    },
    /// Schedule one message and wait for it to be sent
    ///
    /// Runs the countdown in this process and logs the remaining time every
    /// second. Ctrl+C cancels the message if the webhook has not been called
    /// yet. Exits non-zero when the webhook rejects the message.
    ///
    /// Examples:
    ///   courier-rs send --platform slack --webhook-url URL --message 'Hi'
    ///   courier-rs send --platform discord --webhook-url URL --message 'Hi' --delay 2 --unit hours
    Send(SendArgs),
}

/// Arguments of the `send` command
///
/// Values are checked by the same rules as the HTTP API, so the messages a
/// user sees match the form's.
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Target platform: slack or discord
    #[arg(long)]
    pub platform: String,

    /// Incoming webhook URL of the channel
    #[arg(long, value_name = "URL")]
    pub webhook_url: String,

    /// Message text
    #[arg(short, long)]
    pub message: String,

    /// How many units to wait before sending (1-3600)
    #[arg(short, long, default_value_t = 1)]
    pub delay: u32,

    /// Delay unit: seconds, minutes or hours
    #[arg(short, long, default_value = "seconds", value_parser = super::validation::validate_delay_unit)]
    pub unit: DelayUnit,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Send(args)) = &self.command
            && args.message.trim().is_empty()
        {
            return Err("Message cannot be empty".to_string());
        }

        Ok(())
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["courier-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["courier-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["courier-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run,
        }) = cli.command
        else {
            panic!("Expected Serve command");
        };
        assert_eq!(host.as_deref(), Some("0.0.0.0"));
        assert_eq!(port, Some(8080));
        assert_eq!(log_level, Some(LogLevel::Debug));
        assert!(!dry_run);
    }

    #[test]
    fn test_send_command_defaults() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "discord",
            "--webhook-url",
            "https://discord.com/api/webhooks/1/abc",
            "--message",
            "hello",
        ])
        .unwrap();
        let Some(Commands::Send(args)) = cli.command else {
            panic!("Expected Send command");
        };
        assert_eq!(args.platform, "discord");
        assert_eq!(args.delay, 1);
        assert_eq!(args.unit, DelayUnit::Seconds);
    }

    #[test]
    fn test_send_command_unit() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "slack",
            "--webhook-url",
            "u",
            "--message",
            "m",
            "--delay",
            "5",
            "--unit",
            "Minutes",
        ])
        .unwrap();
        let Some(Commands::Send(args)) = cli.command else {
            panic!("Expected Send command");
        };
        assert_eq!((args.delay, args.unit), (5, DelayUnit::Minutes));

        let err = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "slack",
            "--webhook-url",
            "u",
            "--message",
            "m",
            "--unit",
            "days",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_send_requires_message() {
        let err = Cli::try_parse_from(["courier-rs", "send", "--platform", "slack"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_blank_message_rejected() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--platform",
            "slack",
            "--webhook-url",
            "u",
            "--message",
            "   ",
        ])
        .unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["courier-rs", "--env", "stage"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Staging));
        assert_eq!(
            crate::config::Environment::from(Environment::Staging),
            crate::config::Environment::Staging
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["courier-rs", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
