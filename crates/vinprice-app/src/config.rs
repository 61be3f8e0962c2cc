//! Configuration management for vinprice
//!
//! Config stored at: ~/.config/vinprice/config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vinprice_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Historical sales CSV
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Directory holding deduction_rules.json (defaults to the user data dir)
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Rules file override; takes precedence over store_dir
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Pre-built price model artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model").join("price_model.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            store_dir: None,
            rules_path: None,
            model_path: default_model_path(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("vinprice");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory for persisted rules
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("vinprice");
        Ok(store_dir)
    }

    /// Deduction rules file
    pub fn rules_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.rules_path {
            return Ok(path.clone());
        }
        Ok(self.store_dir()?.join("deduction_rules.json"))
    }

    /// Load config from the default location, or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a file, or use defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vehicle Price Estimator Configuration")?;
        writeln!(f, "=====================================")?;
        writeln!(f)?;
        writeln!(f, "Dataset:        {}", self.dataset_path.display())?;
        writeln!(
            f,
            "Rules file:     {}",
            self.rules_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Model artifact: {}", self.model_path.display())?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
