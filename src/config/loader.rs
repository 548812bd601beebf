//! Configuration loader
//!
//! Loads `Settings` from TOML files and `FARM_*` environment variables
//! with a fixed precedence order.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "FARM_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "FARM_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "FARM";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Layered configuration loader
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional)
/// 4. `FARM_*` environment variables
///
/// When a single configuration file is selected, it replaces steps 1-3.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `FARM_CONFIG_DIR`, `FARM_CONFIG_FILE` and `FARM_APP_ENV`
    ///
    /// # Errors
    ///
    /// Returns `MutualExclusivityError` if both `FARM_CONFIG_DIR` and
    /// `FARM_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "FARM_CONFIG_DIR and FARM_CONFIG_FILE cannot both be set. \
                 Use FARM_CONFIG_DIR for layered configuration or \
                 FARM_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load from a single file instead of the layered directory
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use layered loading from `dir`
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self.config_file = None;
        self
    }

    /// Override the environment read from `FARM_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// - `FileNotFound` when `default.toml` (or the single file) is missing
    /// - `ParseError` when the merged sources do not deserialize
    /// - `ValidationError` when a value is out of range
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(Config::builder(), config_file, true)?,
            None => self.build_layered_config(Config::builder())?,
        };

        // FARM_SERVER__PORT -> server.port
        Self::add_env_source(builder)
            .build()
            .map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEST_ENV_LOCK;
    use std::fs;
    use tempfile::TempDir;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets or removes environment variables and restores them on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }

        fn clear_loader_vars(&mut self) {
            for key in [CONFIG_DIR_ENV, CONFIG_FILE_ENV, AppEnvironment::ENV_VAR] {
                self.remove(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_CONFIG: &str = r#"
[application]
name = "test-app"
version = "1.0.0"

[server]
host = "127.0.0.1"
port = 3000

[logger]
level = "info"

[logger.console]
enabled = true
colored = false
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.clear_loader_vars();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file().is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("FARM_CONFIG_DIR"));
                assert!(msg.contains("FARM_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_config_loader_environment_from_env() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.clear_loader_vars();
        env.set(AppEnvironment::ENV_VAR, "prod");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[]);

        let result = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .load();

        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);

        let settings = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .load()
            .expect("Should load settings");

        assert_eq!(settings.application.name, "test-app");
        assert_eq!(settings.application.version, "1.0.0");
        assert_eq!(settings.server.port, 3000);
        assert!(!settings.logger.console.colored);
    }

    #[test]
    fn test_load_with_environment_and_local_override() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("production.toml", "[server]\nhost = \"0.0.0.0\"\nport = 8080\n"),
            ("local.toml", "[server]\nport = 9000\n"),
        ]);

        let settings = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .with_environment(AppEnvironment::Production)
            .load()
            .expect("Should load settings");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.application.name, "test-app");
    }

    #[test]
    fn test_environment_file_ignored_for_other_environment() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("production.toml", "[server]\nport = 8080\n"),
        ]);

        let settings = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .with_environment(AppEnvironment::Test)
            .load()
            .expect("Should load settings");

        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_env_var_overrides_file() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.set("FARM_SERVER__PORT", "4321");
        env.set("FARM_LOGGER__LEVEL", "debug");
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);

        let settings = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .load()
            .expect("Should load settings");

        assert_eq!(settings.server.port, 4321);
        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn test_single_file_mode() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[("custom.toml", "[server]\nport = 7070\n")]);

        let settings = ConfigLoader::default()
            .with_file(temp_dir.path().join("custom.toml"))
            .load()
            .expect("Should load settings");

        assert_eq!(settings.server.port, 7070);
        assert_eq!(settings.application.name, "farm-demo");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[("default.toml", "[server]\nport = 0\n")]);

        let result = ConfigLoader::default()
            .with_config_dir(temp_dir.path())
            .load();

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
