use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    analytics::LabelOptions,
    core::utils::{app_data_dir, config_file_in, ensure_dir, resolve_in},
    errors::{LedgerError, Result},
    storage::json_backend::{sibling_path, write_synced},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub detail_threshold_percent: f64,
    pub transactions_file: PathBuf,
    pub credentials_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "NT$".into(),
            detail_threshold_percent: 3.0,
            transactions_file: PathBuf::from("transactions.json"),
            credentials_file: PathBuf::from("users.json"),
        }
    }
}

impl Config {
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            currency_symbol: self.currency_symbol.clone(),
            detail_threshold_percent: self.detail_threshold_percent,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.detail_threshold_percent) {
            return Err(LedgerError::Config(format!(
                "detail_threshold_percent must be within 0..=100, got {}",
                self.detail_threshold_percent
            )));
        }
        Ok(())
    }
}

/// Loads and saves `config.json` inside the data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| LedgerError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = sibling_path(&self.path, "tmp");
        write_synced(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transactions_path(&self, config: &Config) -> PathBuf {
        resolve_in(&self.base, &config.transactions_file)
    }

    pub fn credentials_path(&self, config: &Config) -> PathBuf {
        resolve_in(&self.base, &config.credentials_file)
    }
}
