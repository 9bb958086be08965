//! JSON state file holding the ledger between invocations

use anyhow::{Context, Result};
use memecoin_ledger::{Ledger, LedgerError, LedgerParams};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct StateStore {
    path: PathBuf,
    /// Parameters for a ledger created from scratch
    params: LedgerParams,
}

impl StateStore {
    pub fn new(path: PathBuf, params: LedgerParams) -> Self {
        Self { path, params }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger, or start a fresh one if the file does not exist yet
    pub async fn load(&self) -> Result<Ledger> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => {
                let ledger = serde_json::from_str(&data)
                    .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
                log::debug!("loaded state from {}", self.path.display());
                Ok(ledger)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no state at {}, starting fresh", self.path.display());
                Ok(Ledger::new(self.params))
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read state file: {}", self.path.display())),
        }
    }

    /// Write the ledger through a temp file and rename it into place
    pub async fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let data = serde_json::to_string_pretty(ledger).context("Failed to serialize state")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace state file: {}", self.path.display()))?;

        log::debug!("saved state to {}", self.path.display());
        Ok(())
    }

    /// Load, apply `op`, and save only if `op` succeeded
    pub async fn update<T>(&self, op: impl FnOnce(&mut Ledger) -> Result<T, LedgerError>) -> Result<T> {
        let mut ledger = self.load().await?;
        let out = op(&mut ledger)?;
        self.save(&ledger).await?;
        Ok(out)
    }
}
