//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Settings};

/// Applies CLI overrides on top of file and environment configuration
///
/// Precedence, highest first: CLI flags, `FARM_*` variables, config files, defaults.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration according to the global CLI options
    ///
    /// `--config` switches to single-file loading and `--env` overrides
    /// `FARM_APP_ENV` for the layered lookup.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = &cli.config {
            loader = loader.with_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Self::from_loader(&loader)
    }

    /// Load the base configuration from an explicit loader
    pub fn from_loader(loader: &ConfigLoader) -> Result<Self, ConfigError> {
        tracing::debug!(
            environment = %loader.environment(),
            config_dir = %loader.config_dir().display(),
            config_file = ?loader.config_file(),
            "Loading configuration"
        );
        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new, validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        if let Some(command) = &cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }
                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }
                // Beats --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = (*level).into();
                }
            }
        }
    }

    /// Get the base configuration before CLI overrides
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEST_ENV_LOCK;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli)
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_no_flags_keeps_base_config() {
        assert_eq!(merge(&["farm-demo"]).unwrap(), Settings::default());
    }

    #[test]
    fn test_merge_verbose_flag() {
        assert_eq!(merge(&["farm-demo", "--verbose"]).unwrap().logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        assert_eq!(merge(&["farm-demo", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_merge_serve_host_and_port() {
        let merged = merge(&["farm-demo", "serve", "--host", "0.0.0.0", "--port", "9090"]).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["farm-demo", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut base = Settings::default();
        base.logger.console.enabled = false;
        base.logger.file.enabled = false;

        let cli = Cli::try_parse_from(["farm-demo"]).unwrap();
        let result = ConfigurationMerger::new(base).merge_cli_args(&cli);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_from_loader_single_file() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[server]\nport = 7070\n").unwrap();

        let loader = ConfigLoader::default().with_file(&path);
        let merger = ConfigurationMerger::from_loader(&loader).unwrap();
        assert_eq!(merger.config().server.port, 7070);

        let cli = Cli::try_parse_from(["farm-demo", "serve", "--port", "6060"]).unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap().server.port, 6060);
    }
}
