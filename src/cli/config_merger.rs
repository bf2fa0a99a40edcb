//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration
///
/// CLI arguments take precedence over every file and environment layer.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the global flags ask for it.
    ///
    /// - `--config FILE` reads that single file
    /// - `--env ENV` reads the layered directory with the given overlay
    /// - otherwise `COURIER_CONFIG_DIR`, `COURIER_CONFIG_FILE` and
    ///   `COURIER_APP_ENV` decide
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match (&cli.config, cli.env) {
            (Some(path), _) => ConfigLoader::with_file(path),
            (None, Some(env)) => ConfigLoader::new()?.with_environment(env.into()),
            (None, None) => ConfigLoader::new()?,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Returns a copy of the base configuration with CLI overrides applied.
    ///
    /// Command-specific flags win over the global `--verbose`/`--quiet`.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host_addr) = host {
                config.server.host = host_addr.clone();
            }
            if let Some(port_num) = port {
                config.server.port = *port_num;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use clap::Parser;

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_flag() {
        assert_eq!(merge(&["courier-rs", "--verbose"]).logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        assert_eq!(merge(&["courier-rs", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_merge_serve_host_and_port() {
        let merged = merge(&["courier-rs", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["courier-rs", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_send_leaves_server_untouched() {
        let merged = merge(&[
            "courier-rs",
            "send",
            "--platform",
            "slack",
            "--webhook-url",
            "u",
            "--message",
            "m",
        ]);
        assert_eq!(merged, Settings::default());
    }

    #[test]
    fn test_from_cli_reads_config_file() {
        let _lock = crate::config::ENV_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("courier.toml");
        std::fs::write(&path, "[server]\nport = 4100\n\n[notifications]\nlimit = 3\n").unwrap();

        let cli =
            Cli::try_parse_from(["courier-rs", "--config", path.to_str().unwrap(), "serve"])
                .unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();
        assert_eq!(merger.config().server.port, 4100);
        assert_eq!(merger.config().notifications.limit, 3);
    }
}
