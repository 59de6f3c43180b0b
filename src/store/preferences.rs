use crate::core::CurrencyPair;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Holds the user's default currency pair as `FROM,TO`.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn default_pair(&self) -> Result<Option<CurrencyPair>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read default pair: {}", self.path.display()))?;
        let pair = content
            .parse()
            .with_context(|| format!("Malformed default pair file: {}", self.path.display()))?;
        Ok(Some(pair))
    }

    pub fn set_default_pair(&self, pair: &CurrencyPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&self.path, pair.to_string())
            .with_context(|| format!("Failed to write default pair: {}", self.path.display()))?;
        info!("Default currency pair set to {}", pair);
        Ok(())
    }
}
