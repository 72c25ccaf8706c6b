//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the source tree to analyze
    pub source_dir: PathBuf,

    /// JSON file listing the components to classify
    pub components_file: Option<PathBuf>,

    /// Extra glob patterns for files and directories to skip
    pub ignore_patterns: Vec<String>,

    /// Maximum number of barrel files followed per re-export chain
    pub max_reexport_depth: usize,

    /// Number of parser threads
    pub concurrency: usize,

    /// Stop scheduling new file parses after this many seconds
    pub timeout_secs: Option<u64>,

    /// Whether package.json devDependencies become components
    pub include_dev_deps: bool,

    /// Whether package.json peerDependencies become components
    pub include_peer_deps: bool,

    /// Whether package.json optionalDependencies become components
    pub include_optional_deps: bool,

    /// Output format (text, json)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            components_file: None,
            ignore_patterns: Vec::new(),
            max_reexport_depth: 5,
            concurrency: 10,
            timeout_secs: None,
            include_dev_deps: true,
            include_peer_deps: true,
            include_optional_deps: true,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON array of component results
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub source_dir: Option<PathBuf>,
    pub components_file: Option<PathBuf>,
    pub ignore_patterns: Option<Vec<String>>,
    pub max_reexport_depth: Option<usize>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub include_dev_deps: Option<bool>,
    pub include_peer_deps: Option<bool>,
    pub include_optional_deps: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.source_dir.is_some() {
            self.source_dir = other.source_dir;
        }
        if other.components_file.is_some() {
            self.components_file = other.components_file;
        }
        if other.ignore_patterns.is_some() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.max_reexport_depth.is_some() {
            self.max_reexport_depth = other.max_reexport_depth;
        }
        if other.concurrency.is_some() {
            self.concurrency = other.concurrency;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.include_dev_deps.is_some() {
            self.include_dev_deps = other.include_dev_deps;
        }
        if other.include_peer_deps.is_some() {
            self.include_peer_deps = other.include_peer_deps;
        }
        if other.include_optional_deps.is_some() {
            self.include_optional_deps = other.include_optional_deps;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(source_dir) = &self.source_dir {
            settings.source_dir = source_dir.clone();
        }
        if let Some(components_file) = &self.components_file {
            settings.components_file = Some(components_file.clone());
        }
        if let Some(ignore_patterns) = &self.ignore_patterns {
            settings.ignore_patterns = ignore_patterns.clone();
        }
        if let Some(depth) = self.max_reexport_depth {
            settings.max_reexport_depth = depth;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = Some(timeout);
        }
        if let Some(include_dev_deps) = self.include_dev_deps {
            settings.include_dev_deps = include_dev_deps;
        }
        if let Some(include_peer_deps) = self.include_peer_deps {
            settings.include_peer_deps = include_peer_deps;
        }
        if let Some(include_optional_deps) = self.include_optional_deps {
            settings.include_optional_deps = include_optional_deps;
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
