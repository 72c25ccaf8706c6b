//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments that map onto settings
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub components: Option<PathBuf>,
    pub ignore: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub no_dev_deps: bool,
    pub no_peer_deps: bool,
    pub no_optional_deps: bool,
    pub no_ignore_file: bool,
    pub config: Option<PathBuf>,
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from Args
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            path: args.path.clone(),
            components: args.components.clone(),
            ignore: if args.ignore.is_empty() {
                None
            } else {
                Some(args.ignore.clone())
            },
            max_depth: args.max_depth,
            concurrency: args.concurrency,
            timeout: args.timeout,
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
            }),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            no_dev_deps: args.no_dev_deps,
            no_peer_deps: args.no_peer_deps,
            no_optional_deps: args.no_optional_deps,
            no_ignore_file: args.no_ignore_file,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let mut settings = PartialSettings {
            source_dir: args.path.clone(),
            components_file: args.components.clone(),
            ignore_patterns: args.ignore.clone(),
            max_reexport_depth: args.max_depth,
            concurrency: args.concurrency,
            timeout_secs: args.timeout,
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            ..PartialSettings::default()
        };

        // Flags only override when given
        if args.quiet {
            settings.quiet = Some(true);
            settings.show_progress = Some(false);
        }
        if args.verbose {
            settings.verbose = Some(true);
        }
        if args.no_colors {
            settings.use_colors = Some(false);
        }
        if args.no_progress {
            settings.show_progress = Some(false);
        }
        if args.no_dev_deps {
            settings.include_dev_deps = Some(false);
        }
        if args.no_peer_deps {
            settings.include_peer_deps = Some(false);
        }
        if args.no_optional_deps {
            settings.include_optional_deps = Some(false);
        }

        Ok(settings)
    }

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
