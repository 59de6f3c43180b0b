use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FREECURRENCY_URL: &str = "https://freecurrencyapi.net";
pub const DEFAULT_IPREGISTRY_URL: &str = "https://api.ipregistry.co";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiProviderConfig {
    pub base_url: String,
    /// Key used verbatim when present.
    pub api_key: Option<String>,
    /// Environment variable to read the key from otherwise.
    pub api_key_env: Option<String>,
}

impl ApiProviderConfig {
    fn with_env(base_url: &str, env: &str) -> Self {
        ApiProviderConfig {
            base_url: base_url.to_string(),
            api_key: None,
            api_key_env: Some(env.to_string()),
        }
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_deref()
                .and_then(|name| std::env::var(name).ok())
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default = "default_freecurrency")]
    pub freecurrency: ApiProviderConfig,
    #[serde(default = "default_ipregistry")]
    pub ipregistry: ApiProviderConfig,
}

fn default_freecurrency() -> ApiProviderConfig {
    ApiProviderConfig::with_env(DEFAULT_FREECURRENCY_URL, "EXCHANGE_RATE_API_KEY")
}

fn default_ipregistry() -> ApiProviderConfig {
    ApiProviderConfig::with_env(DEFAULT_IPREGISTRY_URL, "IPREGISTRY_API_KEY")
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            freecurrency: default_freecurrency(),
            ipregistry: default_ipregistry(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Directory holding the code registry and default pair files.
    pub data_path: Option<String>,
    /// Write request URLs and raw responses to the cache directory.
    #[serde(default)]
    pub debug_dump: bool,
    /// Rate used when the provider answers with something that is not JSON.
    pub fallback_rate: Option<f64>,
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "curconv", "curconv")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Debug dumps land next to the data files unless a custom data path is
    /// set, in which case they go to its `temp` subdirectory.
    pub fn debug_dump_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path).join("temp"));
        }
        Ok(Self::project_dirs()?.cache_dir().to_path_buf())
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
