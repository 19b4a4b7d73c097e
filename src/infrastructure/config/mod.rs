//! Configuration loading with hierarchical merging.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Default language cannot be empty")]
    EmptyDefaultLanguage,

    #[error("Invalid cache max_weight: {0}. Must be positive")]
    InvalidCacheWeight(u64),

    #[error("Failed to read configuration: {0}")]
    ReadFailed(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .strata/config.yaml (project config, optional)
    /// 3. Environment variables (`STRATA_*` prefix, `__` as separator)
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from(".strata/config.yaml")
    }

    /// Load from an explicit YAML path instead of the project default.
    pub fn load_from(path: &str) -> Result<Config, ConfigError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("STRATA_").split("__"))
            .extract()
            .map_err(|e| ConfigError::ReadFailed(e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if config.database.max_connections < 1 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }
        if config.repository.default_language.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultLanguage);
        }
        if config.cache.max_weight == 0 {
            return Err(ConfigError::InvalidCacheWeight(config.cache.max_weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_load_without_config_file() {
        let config = ConfigLoader::load_from("/nonexistent/config.yaml")
            .expect("defaults should load");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.repository.default_language, "en");
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(
            file,
            "database:\n  url: \"sqlite::memory:\"\n  max_connections: 9\nrepository:\n  default_language: \"de\""
        )
        .expect("failed to write config");

        let config = ConfigLoader::load_from(file.path().to_str().expect("utf-8 path"))
            .expect("config should load");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 9);
        assert_eq!(config.repository.default_language, "de");
        // Untouched sections keep their defaults.
        assert!(config.cache.max_weight > 0);
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "database:\n  url: \"\"").expect("failed to write config");

        let result = ConfigLoader::load_from(file.path().to_str().expect("utf-8 path"));
        assert!(matches!(result, Err(ConfigError::EmptyDatabaseUrl)));
    }

    #[test]
    fn test_zero_cache_weight_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "cache:\n  max_weight: 0").expect("failed to write config");

        let result = ConfigLoader::load_from(file.path().to_str().expect("utf-8 path"));
        assert!(matches!(result, Err(ConfigError::InvalidCacheWeight(0))));
    }
}
