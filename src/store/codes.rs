use crate::core::{CurrencyCode, RateProvider};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Base currency queried when the registry has to be rebuilt. Any quoted
/// currency works, the table it returns lists every supported code.
const SEED_BASE: &str = "GBP";

/// Known currency codes, cached as one comma separated line.
pub struct CodeRegistry {
    path: PathBuf,
}

impl CodeRegistry {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing has been cached yet.
    pub fn cached(&self) -> Result<Option<BTreeSet<CurrencyCode>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read code cache: {}", self.path.display()))?;

        let mut codes = BTreeSet::new();
        for field in content.trim().split(',').filter(|f| !f.trim().is_empty()) {
            match field.parse::<CurrencyCode>() {
                Ok(code) => {
                    codes.insert(code);
                }
                Err(e) => warn!("Skipping cached entry: {}", e),
            }
        }

        if codes.is_empty() {
            debug!("Code cache at {} is empty", self.path.display());
            return Ok(None);
        }
        Ok(Some(codes))
    }

    pub fn cache(&self, codes: &BTreeSet<CurrencyCode>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let line = codes
            .iter()
            .map(CurrencyCode::as_str)
            .collect::<Vec<_>>()
            .join(",");
        fs::write(&self.path, line)
            .with_context(|| format!("Failed to write code cache: {}", self.path.display()))?;
        info!("Cached {} currency codes to {}", codes.len(), self.path.display());
        Ok(())
    }

    /// Returns the cached codes, fetching and caching them on first use.
    pub async fn load_or_fetch(
        &self,
        provider: &(dyn RateProvider + Send + Sync),
    ) -> Result<BTreeSet<CurrencyCode>> {
        if let Some(codes) = self.cached()? {
            debug!("Loaded {} codes from cache", codes.len());
            return Ok(codes);
        }
        self.refresh(provider).await
    }

    #[instrument(name = "CodeRegistryRefresh", skip(self, provider))]
    pub async fn refresh(
        &self,
        provider: &(dyn RateProvider + Send + Sync),
    ) -> Result<BTreeSet<CurrencyCode>> {
        let base: CurrencyCode = SEED_BASE.parse()?;
        let table = provider
            .latest_rates(&base)
            .await
            .context("Failed to fetch currency codes")?;

        let mut codes: BTreeSet<CurrencyCode> = table
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect();
        codes.insert(base);

        self.cache(&codes)?;
        Ok(codes)
    }
}
