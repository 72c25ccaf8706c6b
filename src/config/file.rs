//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{OptionExt, ReachabilityError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".reachability.toml";

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "REACHABILITY";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        let path = Some(self.path.as_path())
            .filter(|path| path.is_file())
            .ok_or_error(|| ReachabilityError::ConfigNotFound {
                path: self.path.clone(),
            })?;
        parser::parse_config_file(path)
    }

    // An explicitly named file that is missing must fail in `load`
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
///
/// Reads `<PREFIX>_SOURCE_DIR`, `_COMPONENTS`, `_IGNORE` (comma separated),
/// `_MAX_DEPTH`, `_CONCURRENCY`, `_TIMEOUT` and `_OUTPUT_FORMAT`.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

const ENV_KEYS: &[&str] = &[
    "SOURCE_DIR",
    "COMPONENTS",
    "IGNORE",
    "MAX_DEPTH",
    "CONCURRENCY",
    "TIMEOUT",
    "OUTPUT_FORMAT",
];

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.var(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| ReachabilityError::Config {
                message: format!("Invalid value '{}' for {}_{}", raw, self.prefix, key),
            }),
        }
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(path) = self.var("SOURCE_DIR") {
            settings.source_dir = Some(PathBuf::from(path));
        }
        if let Some(path) = self.var("COMPONENTS") {
            settings.components_file = Some(PathBuf::from(path));
        }
        if let Some(ignore) = self.var("IGNORE") {
            settings.ignore_patterns = Some(
                ignore
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        settings.max_reexport_depth = self.parsed("MAX_DEPTH")?;
        settings.concurrency = self.parsed("CONCURRENCY")?;
        settings.timeout_secs = self.parsed("TIMEOUT")?;
        settings.output_format = self.parsed("OUTPUT_FORMAT")?;

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
