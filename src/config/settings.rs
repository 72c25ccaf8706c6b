//! Settings validation

use crate::error::{ReachabilityError, Result};
use crate::models::config::Settings;
use std::path::Path;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.source_dir.is_dir() {
            return Err(ReachabilityError::InvalidPath {
                path: settings.source_dir.clone(),
            });
        }

        for pattern in &settings.ignore_patterns {
            glob::Pattern::new(pattern)?;
        }

        if settings.max_reexport_depth == 0 {
            return Err(ReachabilityError::config_error("max_reexport_depth must be at least 1"));
        }

        if settings.concurrency == 0 {
            return Err(ReachabilityError::config_error("concurrency must be at least 1"));
        }

        if settings.timeout_secs == Some(0) {
            return Err(ReachabilityError::config_error("timeout_secs must be at least 1"));
        }

        if settings.quiet && settings.verbose {
            return Err(ReachabilityError::config_error("quiet and verbose cannot both be set"));
        }

        if let Some(path) = &settings.components_file {
            if !path.is_file() {
                return Err(ReachabilityError::components_file_error(path, "file does not exist"));
            }
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that the directory of an output path exists
    fn validate_output_path(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(ReachabilityError::OutputDirectoryNotFound {
                    path: parent.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}
