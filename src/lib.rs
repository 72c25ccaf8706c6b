//! Reachability - decides whether declared JavaScript/TypeScript dependencies
//! are actually imported and invoked.
//!
//! The engine parses every source file of a project once, follows re-exports
//! through barrel files and classifies each component as `reachable`,
//! `imported`, `indirect`, `not_reachable` or `unknown`, with a confidence and
//! the warnings that qualify the verdict.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{EngineOptions, ReachabilityEngine};
pub use error::{handle_error, try_with_recovery, ErrorSeverity, OptionExt, ReachabilityError, Result, ResultExt};
pub use models::{
    config::Settings, AnalysisWarning, Component, ComponentResult, Confidence, ReachabilityStatus, UsageInfo,
    Vulnerability, WarningCode,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
