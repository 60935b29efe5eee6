use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{BundledSource, CatalogSource, FileSource, HttpSource};
use crate::domain::SortKey;
use crate::session::{LocalProfileProvider, UserProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub source: SourceConfig,
    pub browse: BrowseConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Bundled,
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub path: Option<PathBuf>,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Bundled,
            path: None,
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 10000,
        }
    }
}

impl SourceConfig {
    /// Build the configured catalog source
    pub fn build(&self) -> Result<Arc<dyn CatalogSource>> {
        let source: Arc<dyn CatalogSource> = match self.kind {
            SourceKind::Bundled => Arc::new(BundledSource::new()),
            SourceKind::File => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| eyre::eyre!("source.kind is 'file' but source.path is not set"))?;
                Arc::new(FileSource::new(path))
            }
            SourceKind::Http => Arc::new(
                HttpSource::new(&self.base_url, Duration::from_millis(self.timeout_ms))
                    .context("Failed to create catalog API client")?,
            ),
        };
        Ok(source)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub default_sort: Option<SortKey>,
    pub tick_rate_ms: u64,
    pub featured: Vec<String>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            default_sort: None,
            tick_rate_ms: 250,
            featured: ["ChatGPT", "Claude", "Midjourney", "GitHub Copilot"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl IdentityConfig {
    /// Local identity provider for the configured profile
    pub fn provider(&self) -> Result<LocalProfileProvider> {
        let profile = match (&self.display_name, &self.email) {
            (Some(name), Some(email)) => {
                Some(UserProfile::new(name, email).context("Invalid identity.email in config")?)
            }
            (None, None) => None,
            _ => eyre::bail!("identity needs both display_name and email"),
        };
        Ok(LocalProfileProvider::new(profile))
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Point the source at a local JSON file
    pub fn use_file(&mut self, path: PathBuf) {
        self.source.kind = SourceKind::File;
        self.source.path = Some(path);
    }

    /// Point the source at a catalog API
    pub fn use_api(&mut self, base_url: String) {
        self.source.kind = SourceKind::Http;
        self.source.base_url = base_url;
    }
}
