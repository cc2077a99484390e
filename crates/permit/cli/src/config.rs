//! CLI configuration

use crate::error::{CliError, CliResult};
use permit_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Catalog file used instead of the built-in catalog
    pub catalog: Option<String>,

    /// Engine settings: approvers, comment policy, id attempts
    #[serde(default)]
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            tracing::debug!(path = %config_path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("permit").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.catalog.is_none());
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        // Should return default config when file doesn't exist
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert!(config.catalog.is_none());
        assert!(!config.engine.require_comments);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: CliConfig = toml::from_str(
            r#"
            catalog = "catalog.yaml"

            [engine]
            require_comments = true

            [engine.approvers]
            technical = "Grace Hopper"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.as_deref(), Some("catalog.yaml"));
        assert!(config.engine.require_comments);
        assert_eq!(config.engine.approvers.technical, "Grace Hopper");
        assert_eq!(config.engine.approvers.business, "John Doe");
    }
}
