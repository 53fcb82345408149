use converter_core::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_substitution;

pub use env_substitution::substitute_env_vars;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub rates: RateSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default = "default_rates_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ConverterConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConverterError::ConfigError(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| ConverterError::ConfigError(format!("Failed to parse YAML: {}", e)))?;

        // An empty document parses as null; treat it as "all defaults".
        let mut tree = match serde_json::to_value(raw)? {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };
        substitute_env_vars(&mut tree)?;

        let mut config: ConverterConfig = serde_json::from_value(tree)
            .map_err(|e| ConverterError::ConfigError(format!("Invalid configuration: {}", e)))?;

        config.expand_env_vars();
        config.validate()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn expand_env_vars(&mut self) {
        if let Ok(home_dir) = env::var("HOME_DIR") {
            self.storage.data_dir = PathBuf::from(home_dir);
        }
    }

    fn validate(&self) -> Result<()> {
        let url = self.rates.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConverterError::ConfigError(
                "Rate service URL must start with http:// or https://".into(),
            ));
        }
        if self.rates.timeout_ms == 0 {
            return Err(ConverterError::ConfigError("Rate service timeout must be positive".into()));
        }
        if self.storage.database_file.trim().is_empty() {
            return Err(ConverterError::ConfigError("Database file name cannot be empty".into()));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.database_file)
    }

    pub fn default_config_path() -> PathBuf {
        default_data_dir().join("converter.yaml")
    }
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            base_url: default_rates_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_rates_url() -> String { "https://api.exchangerate-api.com/v4/latest".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_database_file() -> String { "conversion_history.db".to_string() }
fn default_output_dir() -> PathBuf { PathBuf::from("./exports") }

fn default_data_dir() -> PathBuf {
    env::var("HOME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|p| p.join(".unit-converter"))
                .unwrap_or_else(|| PathBuf::from("./.unit-converter"))
        })
}
