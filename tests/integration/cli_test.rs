//! Command-line behaviour: argument parsing, component loading and output

use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use reachability::{
    cli::{args::OutputFormat, exit_code, load_components, Args, Command},
    models::config::Settings,
    ComponentResult, ReachabilityError, ReachabilityStatus,
};

fn sample_project() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "app",
            "version": "1.0.0",
            "dependencies": { "lodash": "^4.17.21", "zod": "^3.0.0" },
            "devDependencies": { "vitest": "^1.0.0" }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("src/index.ts"),
        "import { merge } from 'lodash';\nimport { z } from 'zod';\nexport const run = () => merge({}, {});\n",
    )
    .unwrap();
    dir
}

fn run_cli(args: &[&str]) -> Result<(), ReachabilityError> {
    let mut argv = vec!["reachability"];
    argv.extend_from_slice(args);
    Command::from_args(Args::try_parse_from(argv).unwrap()).execute()
}

#[test]
fn test_cli_args_defaults() {
    let args = Args::try_parse_from(["reachability"]).unwrap();
    assert_eq!(args.path, None);
    assert!(args.ignore.is_empty());
    assert_eq!(args.output, None);
    assert!(!args.quiet);
    assert!(!args.init);
}

#[test]
fn test_cli_init_command_is_detected() {
    let args = Args::try_parse_from(["reachability", "--init"]).unwrap();
    assert!(matches!(Command::from_args(args), Command::Init));
}

#[test]
fn test_components_from_package_json() {
    let dir = sample_project();
    let settings = Settings {
        source_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let names: Vec<String> = load_components(&settings).unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["lodash", "zod", "vitest"]);

    let production = Settings {
        include_dev_deps: false,
        ..settings
    };
    assert_eq!(load_components(&production).unwrap().len(), 2);
}

#[test]
fn test_missing_package_json_is_critical() {
    let dir = tempdir().unwrap();
    let settings = Settings {
        source_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let err = load_components(&settings).unwrap_err();
    assert!(matches!(err, ReachabilityError::PackageJsonNotFound { .. }));
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_components_file_shapes() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("list.json");
    fs::write(
        &list,
        r#"[{"name": "lodash", "version": "4.17.20",
             "vulnerabilities": [{"id": "CVE-2021-23337", "affectedFunctions": ["template"]}]}]"#,
    )
    .unwrap();
    let wrapped = dir.path().join("wrapped.json");
    fs::write(&wrapped, r#"{"components": [{"name": "zod"}]}"#).unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"name": "zod"}"#).unwrap();

    let load = |path: &Path| {
        load_components(&Settings {
            source_dir: dir.path().to_path_buf(),
            components_file: Some(path.to_path_buf()),
            ..Settings::default()
        })
    };

    let components = load(&list).unwrap();
    assert_eq!(components[0].affected_functions().into_iter().collect::<Vec<_>>(), vec!["template"]);
    assert_eq!(load(&wrapped).unwrap()[0].name, "zod");
    assert!(matches!(load(&broken), Err(ReachabilityError::ComponentsFile { .. })));
}

#[test]
fn test_cli_writes_json_results() {
    let dir = sample_project();
    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("results.json");

    run_cli(&[
        "--path",
        dir.path().to_str().unwrap(),
        "--output",
        "json",
        "--output-file",
        output.to_str().unwrap(),
        "--quiet",
        "--no-dev-deps",
    ])
    .unwrap();

    let results: Vec<ComponentResult> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].component.name, "lodash");
    assert_eq!(results[0].status, ReachabilityStatus::Reachable);
    assert_eq!(results[1].component.name, "zod");
    assert_eq!(results[1].status, ReachabilityStatus::Imported);
}

#[test]
fn test_cli_writes_text_results() {
    let dir = sample_project();
    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("results.txt");

    run_cli(&[
        "--path",
        dir.path().to_str().unwrap(),
        "--output-file",
        output.to_str().unwrap(),
        "--no-progress",
    ])
    .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("lodash ^4.17.21  REACHABLE (high)"));
    assert!(text.contains("vitest ^1.0.0  NOT_REACHABLE (high)"));
    assert!(!text.contains('\u{1b}'));
    assert!(text.contains("3 components: 1 reachable, 1 imported"));
}

#[test]
fn test_cli_missing_path_is_an_error() {
    let err = run_cli(&["--path", "/no/such/project"]).unwrap_err();
    assert!(matches!(err, ReachabilityError::InvalidPath { .. }));
    assert_eq!(exit_code(&err), 1);
}

#[test]
fn test_output_format_value_enum() {
    let args = Args::try_parse_from(["reachability", "-o", "text"]).unwrap();
    assert_eq!(args.output, Some(OutputFormat::Text));
    assert!(Args::try_parse_from(["reachability", "--output", "csv"]).is_err());
}
