//! Configuration management for the version reporter

use crate::{
    DEFAULT_HOST_PROGRAM, DEFAULT_HOST_VARIABLE, DEFAULT_INDEX_URL, DEFAULT_PACKAGE,
    DEFAULT_PYTHON, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix for environment overrides, e.g. `NVIM_VERSION_INFO__PACKAGE__NAME`
pub const ENV_PREFIX: &str = "NVIM_VERSION_INFO";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Package being reported on
    #[serde(default)]
    pub package: PackageConfig,

    /// Python interpreter configuration
    #[serde(default)]
    pub interpreter: InterpreterConfig,

    /// Host editor configuration
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Package and index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Distribution name on the package index
    #[serde(default = "default_package")]
    pub name: String,

    /// Import name; derived from `name` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Package index base URL
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// User agent for requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Python interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Interpreter executable
    #[serde(default = "default_python")]
    pub program: String,

    /// Module search path; asked from the interpreter when empty
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

/// Host editor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Editor executable used to reach the running instance
    #[serde(default = "default_host_program")]
    pub program: String,

    /// Server address; taken from `$NVIM` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Variable receiving the report
    #[serde(default = "default_host_variable")]
    pub variable: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}
fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_python() -> String {
    DEFAULT_PYTHON.to_string()
}

fn default_host_program() -> String {
    DEFAULT_HOST_PROGRAM.to_string()
}
fn default_host_variable() -> String {
    DEFAULT_HOST_VARIABLE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: default_package(),
            module: None,
            index_url: default_index_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            program: default_python(),
            search_paths: Vec::new(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            program: default_host_program(),
            server: None,
            variable: default_host_variable(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PackageConfig {
    /// Import name of the package
    pub fn module_name(&self) -> String {
        self.module
            .clone()
            .unwrap_or_else(|| self.name.replace('-', "_"))
    }
}

impl AppConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(None::<PathBuf>)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Start with defaults
        builder = builder.add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = config_file {
            let path = path.as_ref();
            // A file named explicitly must exist
            info!("Loading configuration from: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.package.name.trim().is_empty() {
            return Err("Package name cannot be empty".to_string());
        }

        if self.package.timeout_seconds == 0 {
            return Err("Request timeout cannot be 0".to_string());
        }

        if self.interpreter.program.trim().is_empty() {
            return Err("Interpreter program cannot be empty".to_string());
        }

        if self.host.variable.trim().is_empty() {
            return Err("Host variable name cannot be empty".to_string());
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(format!("Invalid log level: {}", self.logging.level));
        }

        Ok(())
    }

    /// Create a sample configuration file
    pub fn create_sample_config() -> String {
        toml::to_string_pretty(&AppConfig::default())
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

/// Environment-specific configuration overrides
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub is_development: bool,
    pub is_production: bool,
    pub is_test: bool,
}

impl EnvironmentConfig {
    pub fn detect() -> Self {
        let env = std::env::var("RUST_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_default()
            .to_lowercase();

        Self {
            is_development: env == "development" || env == "dev",
            is_production: env == "production" || env == "prod",
            is_test: env == "test" || env == "testing",
        }
    }

    /// Apply environment-specific overrides to the configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if self.is_development {
            config.logging.level = "debug".to_string();
        } else if self.is_production {
            config.logging.level = "error".to_string();
        } else if self.is_test {
            config.logging.level = "warn".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.package.name, DEFAULT_PACKAGE);
        assert_eq!(config.package.index_url, DEFAULT_INDEX_URL);
        assert_eq!(config.host.variable, "version_info");
        assert!(config.interpreter.search_paths.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("toml");

        writeln!(
            temp_file,
            r#"
[package]
name = "pynvim"
timeout_seconds = 5

[interpreter]
program = "python3.12"
search_paths = ["/opt/site-packages"]

[logging]
level = "debug"
"#
        )
        .unwrap();

        std::fs::copy(temp_file.path(), &temp_path).unwrap();

        let config = AppConfig::load_from_file(Some(&temp_path)).unwrap();
        assert_eq!(config.package.name, "pynvim");
        assert_eq!(config.package.timeout_seconds, 5);
        assert_eq!(config.package.index_url, DEFAULT_INDEX_URL);
        assert_eq!(config.interpreter.program, "python3.12");
        assert_eq!(
            config.interpreter.search_paths,
            vec![PathBuf::from("/opt/site-packages")]
        );
        assert_eq!(config.logging.level, "debug");

        std::fs::remove_file(&temp_path).ok();
    }

    #[test]
    fn test_module_name() {
        let mut package = PackageConfig::default();
        assert_eq!(package.module_name(), "neovim");

        package.name = "neovim-client".to_string();
        assert_eq!(package.module_name(), "neovim_client");

        package.module = Some("pynvim".to_string());
        assert_eq!(package.module_name(), "pynvim");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.package.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.host.variable = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let env_config = EnvironmentConfig {
            is_development: true,
            is_production: false,
            is_test: false,
        };

        let mut config = AppConfig::default();
        env_config.apply_overrides(&mut config);

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_create_sample_config() {
        let sample = AppConfig::create_sample_config();
        assert!(sample.contains("[package]"));
        assert!(sample.contains("[interpreter]"));
        assert!(sample.contains("[host]"));
        assert!(sample.contains("[logging]"));
    }
}
