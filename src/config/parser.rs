//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{ReachabilityError, Result};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReachabilityError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ReachabilityError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| ReachabilityError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;
    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |message: String| ReachabilityError::Config { message };

    if let Some(source_dir) = &settings.source_dir {
        if source_dir.as_os_str().is_empty() {
            return Err(invalid(format!(
                "Invalid empty source_dir in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(patterns) = &settings.ignore_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(invalid(format!("Empty ignore pattern in config file: {}", path.display())));
            }
            glob::Pattern::new(pattern).map_err(|e| {
                invalid(format!(
                    "Invalid ignore pattern '{}' in config file: {}: {}",
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if settings.max_reexport_depth == Some(0) {
        return Err(invalid(format!(
            "Invalid max_reexport_depth 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if settings.concurrency == Some(0) {
        return Err(invalid(format!(
            "Invalid concurrency 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(invalid(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Places a configuration file is looked for, in order: the current
/// directory, the home directory, then the user config directory
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("reachability").join("config.toml"));
    }
    locations
}

/// Load the first configuration file that exists among `locations`
pub fn find_config_in(locations: &[PathBuf]) -> Result<Option<PartialSettings>> {
    for location in locations {
        if location.is_file() {
            tracing::debug!(file = %location.display(), "using configuration file");
            return Ok(Some(parse_config_file(location)?));
        }
    }
    Ok(None)
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    find_config_in(&default_config_locations())
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(ReachabilityError::io_error)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).map_err(ReachabilityError::io_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
        source_dir = "/test/path"
        ignore_patterns = ["fixtures/**", "*.spec.ts"]
        max_reexport_depth = 7
        concurrency = 4
        output_format = "json"
    "#;

    #[test]
    fn test_parse_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");
        fs::write(&config_path, SAMPLE).unwrap();

        let settings = parse_config_file(&config_path).unwrap();

        assert_eq!(settings.source_dir, Some(PathBuf::from("/test/path")));
        assert_eq!(
            settings.ignore_patterns,
            Some(vec!["fixtures/**".to_string(), "*.spec.ts".to_string()])
        );
        assert_eq!(settings.max_reexport_depth, Some(7));
        assert_eq!(settings.concurrency, Some(4));
    }

    #[test]
    fn test_parse_config_content_errors() {
        assert!(matches!(
            parse_config_content("max_reexport_depth = \"deep\"", "bad.toml"),
            Err(ReachabilityError::ConfigParse { .. })
        ));
        assert!(matches!(
            parse_config_file("/no/such/config.toml"),
            Err(ReachabilityError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_partial_settings() {
        let valid_settings = PartialSettings {
            source_dir: Some(PathBuf::from("/test/path")),
            ignore_patterns: Some(vec!["dist/**".to_string()]),
            max_reexport_depth: Some(5),
            ..Default::default()
        };
        assert!(validate_partial_settings(&valid_settings, "test.toml").is_ok());

        let zero_depth = PartialSettings {
            max_reexport_depth: Some(0),
            ..Default::default()
        };
        assert!(validate_partial_settings(&zero_depth, "test.toml").is_err());

        let zero_concurrency = PartialSettings {
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(validate_partial_settings(&zero_concurrency, "test.toml").is_err());

        let empty_pattern = PartialSettings {
            ignore_patterns: Some(vec!["".to_string()]),
            ..Default::default()
        };
        assert!(validate_partial_settings(&empty_pattern, "test.toml").is_err());

        let bad_glob = PartialSettings {
            ignore_patterns: Some(vec!["[".to_string()]),
            ..Default::default()
        };
        assert!(validate_partial_settings(&bad_glob, "test.toml").is_err());
    }

    #[test]
    fn test_create_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join(".reachability.toml");

        create_default_config(&config_path).unwrap();
        assert!(config_path.exists());

        // Every key in the template is commented out
        let settings = parse_config_file(&config_path).unwrap();
        assert!(settings.source_dir.is_none());
        assert!(settings.max_reexport_depth.is_none());
    }

    #[test]
    fn test_find_config_in() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let present = temp_dir.path().join("present.toml");
        fs::write(&present, "concurrency = 2\n").unwrap();

        let found = find_config_in(&[missing.clone(), present]).unwrap().unwrap();
        assert_eq!(found.concurrency, Some(2));
        assert!(find_config_in(&[missing]).unwrap().is_none());
    }
}
