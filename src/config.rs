use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Currency pair used when the command line does not name one.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "USD".to_string(),
            to: "INR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: crate::providers::frankfurter::DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// no file exists. The tool must stay usable without a `setup` run.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}; using built-in defaults",
                config_path.display()
            );
            return Ok(AppConfig::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory holding the conversion history keyspace.
    pub fn history_path(&self) -> Result<PathBuf> {
        let base = match &self.data_path {
            Some(path) => PathBuf::from(path),
            None => Self::default_data_path()?,
        };
        Ok(base.join("history"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
defaults:
  from: "EUR"
  to: "GBP"
providers:
  frankfurter:
    base_url: "http://example.com/rates"
data_path: "/tmp/fxc-data"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.defaults.from, "EUR");
        assert_eq!(config.defaults.to, "GBP");
        assert_eq!(
            config.providers.frankfurter.unwrap().base_url,
            "http://example.com/rates"
        );
        assert_eq!(config.data_path, Some("/tmp/fxc-data".to_string()));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: \"/tmp/x\"").unwrap();
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "INR");
        assert_eq!(
            config.providers.frankfurter.unwrap().base_url,
            "https://api.frankfurter.app"
        );
    }

    #[test]
    fn test_history_path_prefers_configured_data_path() {
        let config = AppConfig {
            data_path: Some("/tmp/fxc-data".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.history_path().unwrap(),
            PathBuf::from("/tmp/fxc-data/history")
        );
    }
}
