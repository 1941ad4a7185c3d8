//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use impact_commerce::catalog::SkuCatalog;
use impact_commerce::settings::Settings;
use tracing::debug;

use crate::config::{ImpactConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: ImpactConfig,
    /// Where the config was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (ImpactConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (ImpactConfig::default(), None),
            }
        };

        debug!(config = ?config_path, skus = config.skus.len(), "loaded configuration");

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(ImpactConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = ImpactConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Effective platform settings.
    pub fn settings(&self) -> Settings {
        self.config.settings()
    }

    /// SKU catalog from the config.
    pub fn catalog(&self) -> Result<SkuCatalog> {
        self.config.catalog()
    }

    /// Directory data paths are relative to: the config file's, else the cwd.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    pub fn gift_codes_path(&self) -> PathBuf {
        self.resolve_path(&self.config.files.gift_codes)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.resolve_path(&self.config.files.transactions)
    }

    pub fn certificates_path(&self) -> PathBuf {
        self.resolve_path(&self.config.files.certificates)
    }

    /// Resolve a path relative to the config directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.base_dir().join(path)
        }
    }
}

#[cfg(test)]
impl Context {
    /// Context over the default config, with data files under `dir`.
    pub(crate) fn for_dir(dir: &Path) -> Self {
        let config = toml::from_str(&crate::config::generate_default_config())
            .expect("default config parses");
        Self {
            config,
            config_path: Some(dir.join(CONFIG_NAMES[0])),
            output: Output::new(false, false),
            cwd: dir.to_path_buf(),
        }
    }
}
