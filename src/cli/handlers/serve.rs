//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server until a shutdown signal, or only validates the
    /// configuration when `dry_run` is set.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Address binding or server runtime errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.config).run().await
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Webhook connect timeout: {}s",
            self.config.dispatch.connect_timeout
        );
        if self.config.server.cors_allowed_origins.is_empty() {
            println!("✓ CORS disabled");
        } else {
            println!(
                "✓ CORS origins: {}",
                self.config.server.cors_allowed_origins.join(", ")
            );
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
