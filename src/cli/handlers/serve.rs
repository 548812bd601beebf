//! Serve command handler
//!
//! Handles the serve command's dry-run validation. Actual server startup
//! is driven by the binary once configuration is accepted.

use crate::config::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// # Arguments
    /// * `dry_run` - If true, validates configuration and prints a summary
    ///
    /// # Errors
    /// - Configuration validation errors
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only().await
        } else {
            Ok(())
        }
    }

    /// Validate configuration without starting the server
    pub async fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        let logger = &self.config.logger;
        println!("✓ Configuration is valid");
        println!(
            "✓ Application: {} {}",
            self.config.application.name, self.config.application.version
        );
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Log level: {}", logger.level);
        if logger.file.enabled {
            println!(
                "✓ File logging to {} ({})",
                logger.file.path, logger.file.format
            );
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
