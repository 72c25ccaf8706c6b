//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Reachability - find out whether declared dependencies are actually used
#[derive(Parser, Debug)]
#[command(name = "reachability")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify whether a JavaScript/TypeScript project imports and calls its dependencies")]
#[command(long_about = "Reachability parses the JavaScript and TypeScript sources of a project, follows \
re-exports through barrel files and classifies every declared dependency as reachable, imported, \
indirect, not_reachable or unknown. When a component lists vulnerable functions, the report says \
whether any of them is called.")]
#[command(after_help = "EXAMPLES:

    # Classify every dependency in ./package.json against ./
    reachability

    # Analyze another project
    reachability --path ./my-app

    # Classify components (with vulnerabilities) listed in a JSON file
    reachability --components components.json

    # Skip generated code and tests
    reachability --ignore 'gen/**' --ignore '**/*.test.ts'

    # Machine-readable output written to a file
    reachability --output json --output-file reachability.json

    # Production dependencies only
    reachability --no-dev-deps --no-peer-deps --no-optional-deps

    # Create a default .reachability.toml
    reachability --init
")]
pub struct Args {
    /// Source directory to analyze
    #[arg(short, long, value_name = "PATH", help = "Source directory to analyze (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// JSON file with the components to classify
    #[arg(long, value_name = "FILE", help = "JSON array of components ({name, version, vulnerabilities?}); defaults to the dependencies in package.json")]
    pub components: Option<PathBuf>,

    /// Ignore files matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns for files or directories to skip (can be specified multiple times)")]
    pub ignore: Vec<String>,

    /// Maximum number of barrel files followed from one import
    #[arg(long, value_name = "DEPTH", help = "Maximum re-export chain length to follow (default: 5)")]
    pub max_depth: Option<usize>,

    /// Number of files parsed in parallel
    #[arg(long, value_name = "N", help = "Number of files parsed in parallel (default: 10)")]
    pub concurrency: Option<usize>,

    /// Timeout in seconds
    #[arg(long, value_name = "SECONDS", help = "Stop scheduling new files after this many seconds; results are marked partial")]
    pub timeout: Option<u64>,

    /// Output format (text, json)
    #[arg(short, long, value_enum, help = "Output format: 'text' for humans, 'json' for machines (default: text)")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write results to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose", help = "Only print results and errors")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show debug logging and the effective settings")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .reachability.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Exclude development dependencies
    #[arg(long, help = "Do not classify devDependencies from package.json")]
    pub no_dev_deps: bool,

    /// Exclude peer dependencies
    #[arg(long, help = "Do not classify peerDependencies from package.json")]
    pub no_peer_deps: bool,

    /// Exclude optional dependencies
    #[arg(long, help = "Do not classify optionalDependencies from package.json")]
    pub no_optional_deps: bool,

    /// Do not read .reachabilityignore
    #[arg(long, help = "Do not read .reachabilityignore from the source directory")]
    pub no_ignore_file: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable the progress bar")]
    pub no_progress: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.reachability.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
