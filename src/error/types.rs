//! Error types and definitions for the reachability engine
//!
//! Only orchestration-level failures are errors. Per-file parse failures,
//! unresolvable relative imports and re-export cycles are recovered where they
//! happen and surface as skip-list entries or analysis warnings instead.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for reachability operations
#[derive(Debug, Error)]
pub enum ReachabilityError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Components file could not be read or decoded
    #[error("Invalid components file {path}: {message}")]
    ComponentsFile { path: PathBuf, message: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Analysis errors raised at the orchestration layer
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Project manifest not found
    #[error("package.json not found in {path}")]
    PackageJsonNotFound { path: PathBuf },

    /// Invalid package.json structure
    #[error("Invalid package.json structure in {path}: {message}")]
    InvalidPackageJson { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },
}

impl ReachabilityError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            ReachabilityError::PermissionDenied { .. } => ErrorSeverity::Warning,
            ReachabilityError::DirectoryTraversal { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            ReachabilityError::Config { .. } => ErrorSeverity::Critical,
            ReachabilityError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            ReachabilityError::ConfigRead { .. } => ErrorSeverity::Critical,
            ReachabilityError::ConfigParse { .. } => ErrorSeverity::Critical,
            ReachabilityError::ComponentsFile { .. } => ErrorSeverity::Critical,
            ReachabilityError::PackageJsonNotFound { .. } => ErrorSeverity::Critical,
            ReachabilityError::StdoutWrite { .. } => ErrorSeverity::Critical,
            ReachabilityError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ReachabilityError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            ReachabilityError::JsonParse { file, source } => {
                format!("Invalid JSON in '{}': {}. Please check the file format.", file.display(), source)
            }
            ReachabilityError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            ReachabilityError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a valid source directory.", path.display())
            }
            ReachabilityError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            ReachabilityError::PackageJsonNotFound { path } => {
                format!("No package.json found in '{}'. Pass --components to list the dependencies explicitly.", path.display())
            }
            ReachabilityError::InvalidPackageJson { path, message } => {
                format!("Invalid package.json in '{}': {}.", path.display(), message)
            }
            ReachabilityError::ComponentsFile { path, message } => {
                format!("Could not load components from '{}': {}.", path.display(), message)
            }
            ReachabilityError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Suggest a remedy for errors that have an obvious one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ReachabilityError::InvalidPath { .. } => Some("Check that the path exists and is accessible"),
            ReachabilityError::ConfigNotFound { .. } => Some(
                "Create a .reachability.toml file with --init or specify a config file with --config",
            ),
            ReachabilityError::PermissionDenied { .. } => {
                Some("Try running with elevated permissions or check file permissions")
            }
            ReachabilityError::OutputDirectoryNotFound { .. } => {
                Some("Create the output directory first or specify a different path")
            }
            _ => None,
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        ReachabilityError::Io { source }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ReachabilityError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ReachabilityError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        ReachabilityError::PermissionDenied { path: path.into() }
    }

    /// Create an analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        ReachabilityError::Analysis {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ReachabilityError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a components file error
    pub fn components_file_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ReachabilityError::ComponentsFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for ReachabilityError {
    fn from(err: std::io::Error) -> Self {
        ReachabilityError::io_error(err)
    }
}

impl From<toml::de::Error> for ReachabilityError {
    fn from(err: toml::de::Error) -> Self {
        ReachabilityError::TomlParse { source: err }
    }
}

impl From<glob::PatternError> for ReachabilityError {
    fn from(err: glob::PatternError) -> Self {
        ReachabilityError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for ReachabilityError {
    fn from(err: serde_json::Error) -> Self {
        ReachabilityError::JsonSerialize { source: err }
    }
}

/// Result type alias for reachability operations
pub type Result<T> = std::result::Result<T, ReachabilityError>;
