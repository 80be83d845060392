//! Per-file configuration resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::LinterError;
use crate::config::{CONFIG_FILE_NAMES, Config, ConfigFile};

/// Produces the effective configuration for a single file.
///
/// Must be deterministic for a given filesystem state. Errors are reported
/// as an error result for that file only.
pub trait ConfigResolver: Send + Sync {
    fn resolve(&self, path: &Path) -> Result<Config, LinterError>;
}

/// Discovers `.lintel.jsonc`/`.lintel.json` files from the file's directory
/// upwards and merges them outermost first.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalResolver {
    base: Option<ConfigFile>,
}

impl HierarchicalResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `base` before any discovered file.
    pub fn with_base(base: ConfigFile) -> Self {
        Self { base: Some(base) }
    }

    /// Finds the config file in `dir`, if any.
    fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Loads every applicable config file, innermost first.
    fn collect(path: &Path) -> Result<Vec<(PathBuf, ConfigFile)>, LinterError> {
        let mut found = Vec::new();
        let mut dir = path.parent();
        while let Some(current) = dir {
            if let Some(config_path) = Self::find_in(current) {
                debug!("Found config {}", config_path.display());
                let file = ConfigFile::from_file(&config_path)?;
                let is_root = file.root;
                found.push((config_path, file));
                if is_root {
                    break;
                }
            }
            dir = current.parent();
        }
        Ok(found)
    }
}

impl ConfigResolver for HierarchicalResolver {
    fn resolve(&self, path: &Path) -> Result<Config, LinterError> {
        let mut config = Config::new(path);
        if let Some(base) = &self.base {
            config.merge(base, None);
        }
        for (source, file) in Self::collect(path)?.iter().rev() {
            config.merge(file, Some(source));
        }
        Ok(config)
    }
}

/// Returns the same configuration for every file.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    config: Config,
}

impl StaticResolver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the configuration from a single file, without discovery.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let file = ConfigFile::from_file(path)?;
        let mut config = Config::new(PathBuf::new());
        config.merge(&file, Some(path));
        Ok(Self { config })
    }
}

impl Default for StaticResolver {
    fn default() -> Self {
        Self::new(Config::new(PathBuf::new()))
    }
}

impl ConfigResolver for StaticResolver {
    fn resolve(&self, path: &Path) -> Result<Config, LinterError> {
        Ok(self.config.for_path(path))
    }
}
