//! Configuration file and state path resolution

use anyhow::{Context, Result};
use bonding_curve::{CurveParams, GROWTH_RATE, STARTING_PRICE};
use memecoin_ledger::LedgerParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/memecoin/config.toml";
pub const DEFAULT_STATE_PATH: &str = "~/.config/memecoin/state.json";

/// Settings read from `config.toml`
///
/// The economic fields only seed a fresh state file; an existing state keeps
/// the parameters it was created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub state_path: PathBuf,
    pub starting_balance: f64,
    pub creation_fee: f64,
    pub starting_price: f64,
    pub growth_rate: f64,

    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let defaults = LedgerParams::default();
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            starting_balance: defaults.starting_balance,
            creation_fee: defaults.creation_fee,
            starting_price: STARTING_PRICE,
            growth_rate: GROWTH_RATE,
            source: None,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from an explicit path or the default location
    ///
    /// An explicit `config_path` must exist. The default location is optional
    /// and falls back to built-in defaults.
    pub fn load(config_path: Option<PathBuf>, state_override: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let path = expand(&path);
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::from_file(&path)?
            }
            None => {
                let path = expand(Path::new(DEFAULT_CONFIG_PATH));
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("no config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        if let Some(state) = state_override {
            config.state_path = state;
        }
        config.state_path = expand(&config.state_path);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn default_curve(&self) -> Result<CurveParams> {
        CurveParams::new(self.starting_price, self.growth_rate)
            .context("Invalid curve parameters in config")
    }

    pub fn ledger_params(&self) -> Result<LedgerParams> {
        if !(self.starting_balance.is_finite() && self.starting_balance >= 0.0) {
            anyhow::bail!("starting_balance must be non-negative, got {}", self.starting_balance);
        }
        if !(self.creation_fee.is_finite() && self.creation_fee >= 0.0) {
            anyhow::bail!("creation_fee must be non-negative, got {}", self.creation_fee);
        }
        Ok(LedgerParams {
            starting_balance: self.starting_balance,
            creation_fee: self.creation_fee,
            default_curve: self.default_curve()?,
        })
    }
}

/// Expand a leading `~` and environment variables
fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "creation_fee = 2.5\nstate_path = \"/tmp/memecoin-state.json\"").unwrap();

        let config = AppConfig::load(Some(file.path().to_path_buf()), None).unwrap();
        assert_eq!(config.creation_fee, 2.5);
        assert_eq!(config.starting_balance, 100.0);
        assert_eq!(config.state_path, PathBuf::from("/tmp/memecoin-state.json"));
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_state_override_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "state_path = \"/tmp/a.json\"").unwrap();

        let config = AppConfig::load(
            Some(file.path().to_path_buf()),
            Some(PathBuf::from("/tmp/b.json")),
        )
        .unwrap();
        assert_eq!(config.state_path, PathBuf::from("/tmp/b.json"));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(dir.path().join("nope.toml")), None).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "growth_rate = \"fast\"").unwrap();
        assert!(AppConfig::load(Some(file.path().to_path_buf()), None).is_err());
    }

    #[test]
    fn test_ledger_params_validates_curve() {
        let config = AppConfig {
            growth_rate: 0.0,
            ..AppConfig::default()
        };
        assert!(config.ledger_params().is_err());

        let params = AppConfig::default().ledger_params().unwrap();
        assert_eq!(params, LedgerParams::default());
    }
}
