//! Configuration management

pub mod cli;
pub mod file;
pub mod ignore;
pub mod parser;
pub mod settings;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig, ENV_PREFIX};
pub use ignore::{load_ignore_file, IGNORE_FILE};
pub use parser::{create_default_config, find_default_config, parse_config_content, parse_config_file};
pub use settings::SettingsValidator;

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
    use_ignore_file: bool,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
            use_ignore_file: true,
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if source.is_available() {
            tracing::debug!(source = source.name(), "loading configuration");
            let partial = source.load()?;
            Ok(self.merge(partial))
        } else {
            Ok(self)
        }
    }

    /// Try to load from a source, ignoring it if unavailable or broken
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => self.merge(partial),
            Err(err) => {
                tracing::warn!(source = source.name(), error = %err, "ignoring configuration source");
                self
            }
        }
    }

    /// Add configuration from a file
    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let file_config = FileConfig::with_path(path);
        self.load_from(&file_config)
    }

    /// Try to add configuration from the default config file
    pub fn try_add_default_config_file(self) -> Self {
        match parser::find_default_config() {
            Ok(Some(default_config)) => self.merge(default_config),
            Ok(None) => self,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring default configuration file");
                self
            }
        }
    }

    /// Whether `.reachabilityignore` in the source directory is merged in
    pub fn with_ignore_file(mut self, enabled: bool) -> Self {
        self.use_ignore_file = enabled;
        self
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let mut settings = self.partial.to_settings();

        if self.use_ignore_file {
            let extra = ignore::load_ignore_file(&settings.source_dir)?;
            for pattern in extra {
                if !settings.ignore_patterns.contains(&pattern) {
                    settings.ignore_patterns.push(pattern);
                }
            }
        }

        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with proper precedence:
/// config file, then `REACHABILITY_*` variables, then the command line
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let mut builder = ConfigBuilder::new();

    builder = match &cli_args.config {
        Some(path) => builder.load_from(&FileConfig::with_path(path))?,
        None => builder.try_add_default_config_file(),
    };

    builder = builder.try_load_from(&EnvConfig::new(env_prefix));

    let use_ignore_file = !cli_args.no_ignore_file;
    builder
        .load_from(&CliConfig::new(cli_args))?
        .with_ignore_file(use_ignore_file)
        .build()
}
