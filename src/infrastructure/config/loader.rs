use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".reckon";

/// Prefix for environment overrides, e.g. `RECKON_DECISION__MAX_ITERATIONS`.
pub const ENV_PREFIX: &str = "RECKON_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_iterations: 0. Must be at least 1, or null for unbounded")]
    ZeroMaxIterations,

    #[error("Invalid min_iterations: {min}. Cannot exceed max_iterations ({max})")]
    MinExceedsMax { min: u32, max: u32 },

    #[error("Invalid search_limit: 0. Must be at least 1")]
    ZeroSearchLimit,

    #[error("Workspace root location cannot be empty")]
    EmptyRootLocation,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .reckon/config.yaml (project config)
    /// 3. .reckon/local.yaml (project local overrides, optional)
    /// 4. Environment variables (RECKON_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`ConfigLoader::load`], resolving `.reckon/` under `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let decision = &config.decision;
        if let Some(max) = decision.max_iterations {
            if max == 0 {
                return Err(ConfigError::ZeroMaxIterations);
            }
            if decision.min_iterations > max {
                return Err(ConfigError::MinExceedsMax {
                    min: decision.min_iterations,
                    max,
                });
            }
        }

        if config.workspace.search_limit == 0 {
            return Err(ConfigError::ZeroSearchLimit);
        }

        if config.workspace.root_location.trim().is_empty() {
            return Err(ConfigError::EmptyRootLocation);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_validate_zero_max_iterations() {
        let mut config = Config::default();
        config.decision.max_iterations = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ZeroMaxIterations)
        ));
    }

    #[test]
    fn test_validate_min_exceeds_max() {
        let mut config = Config::default();
        config.decision.min_iterations = 6;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MinExceedsMax { min: 6, max: 5 })
        ));

        config.decision.max_iterations = None;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_workspace() {
        let mut config = Config::default();
        config.workspace.search_limit = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ZeroSearchLimit)
        ));

        let mut config = Config::default();
        config.workspace.root_location = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyRootLocation)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "decision:\n  max_iterations: 8\n  min_iterations: 1\nlogging:\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "decision:\n  max_iterations: 3").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.decision.max_iterations, Some(3), "Override should win");
        assert_eq!(
            config.decision.min_iterations, 1,
            "Base value should persist when not overridden"
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.workspace.search_limit, 5);
    }
}
