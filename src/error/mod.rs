//! Error handling for the reachability engine
//!
//! This module provides the error types, result alias and error context
//! utilities shared by the engine, the configuration layer and the CLI.

pub mod context;
pub mod types;

pub use context::{handle_error, try_with_recovery, OptionExt, ResultExt};
pub use types::{ErrorSeverity, ReachabilityError, Result};
