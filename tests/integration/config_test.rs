//! Configuration loading across file, environment and command line

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use reachability::{
    config::{load_config_with_env_prefix, CliArgs, IGNORE_FILE},
    models::config::OutputFormat,
    ReachabilityError,
};

// No variables are ever set under this prefix
const UNUSED_ENV_PREFIX: &str = "REACHABILITY_INTEGRATION_UNSET";

#[test]
fn test_file_then_cli_precedence() {
    let source = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let config_path = config_dir.path().join("reachability.toml");
    fs::write(
        &config_path,
        format!(
            "source_dir = '{}'\nmax_reexport_depth = 9\nconcurrency = 2\noutput_format = \"json\"\n",
            source.path().display()
        ),
    )
    .unwrap();

    let settings = load_config_with_env_prefix(
        CliArgs {
            config: Some(config_path),
            max_depth: Some(3),
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    )
    .unwrap();

    assert_eq!(settings.source_dir, source.path());
    assert_eq!(settings.max_reexport_depth, 3);
    assert_eq!(settings.concurrency, 2);
    assert_eq!(settings.output_format, OutputFormat::Json);
}

#[test]
fn test_ignore_file_patterns_are_merged() {
    let source = tempdir().unwrap();
    fs::write(source.path().join(IGNORE_FILE), "# fixtures\nfixtures/**\n*.spec.ts\n").unwrap();

    let settings = load_config_with_env_prefix(
        CliArgs {
            path: Some(source.path().to_path_buf()),
            ignore: Some(vec!["*.spec.ts".to_string()]),
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    )
    .unwrap();
    assert_eq!(
        settings.ignore_patterns,
        vec!["*.spec.ts".to_string(), "fixtures/**".to_string()]
    );

    let without = load_config_with_env_prefix(
        CliArgs {
            path: Some(source.path().to_path_buf()),
            no_ignore_file: true,
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    )
    .unwrap();
    assert!(without.ignore_patterns.is_empty());
}

#[test]
fn test_invalid_settings_are_rejected() {
    let source = tempdir().unwrap();

    let zero_depth = load_config_with_env_prefix(
        CliArgs {
            path: Some(source.path().to_path_buf()),
            max_depth: Some(0),
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    );
    assert!(zero_depth.is_err());

    let missing_dir = load_config_with_env_prefix(
        CliArgs {
            path: Some(PathBuf::from("/no/such/source/dir")),
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    );
    assert!(matches!(missing_dir, Err(ReachabilityError::InvalidPath { .. })));
}

#[test]
fn test_missing_config_file_is_critical() {
    let err = load_config_with_env_prefix(
        CliArgs {
            config: Some(PathBuf::from("/no/such/reachability.toml")),
            ..CliArgs::default()
        },
        UNUSED_ENV_PREFIX,
    )
    .unwrap_err();
    assert!(err.is_critical());
}
