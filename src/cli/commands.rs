//! Command implementations

use super::Args;
use crate::config::cli::CliArgs;
use crate::config::file::DEFAULT_CONFIG_FILE;
use crate::config::load_config;
use crate::core::{EngineOptions, ReachabilityEngine};
use crate::error::{ErrorSeverity, ReachabilityError, Result};
use crate::logger::should_use_colors;
use crate::models::component::Component;
use crate::models::config::Settings;
use crate::models::result::ComponentResult;
use crate::output::{create_formatter, create_progress_callback, create_writer, ProgressReporter};
use crate::parsers::{DependencySelection, PackageJsonParser};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Classify components against a source directory
    Analyze(Args),
    /// Initialize a default configuration file
    Init,
}

/// Accepted shapes of a components file
#[derive(Deserialize)]
#[serde(untagged)]
enum ComponentsFile {
    List(Vec<Component>),
    Wrapped { components: Vec<Component> },
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                self.validate()?;

                let settings = load_config(CliArgs::from(args))?;
                info!(
                    source_dir = %settings.source_dir.display(),
                    output_format = %settings.output_format,
                    "reachability v{}",
                    env!("CARGO_PKG_VERSION")
                );
                debug!(?settings, "effective settings");

                let results = run_analysis(&settings)?;
                write_results(&settings, &results)
            }
            Command::Init => init_config(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                if let Some(path) = &args.path {
                    if !path.is_dir() {
                        return Err(ReachabilityError::InvalidPath { path: path.clone() });
                    }
                }
                if let Some(config_path) = &args.config {
                    if !config_path.exists() {
                        return Err(ReachabilityError::ConfigNotFound {
                            path: config_path.clone(),
                        });
                    }
                }
                Ok(())
            }
            Command::Init => Ok(()),
        }
    }

    /// Run the command and map the outcome to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                if let Some(suggestion) = err.suggestion() {
                    eprintln!("hint: {}", suggestion);
                }
                exit_code(&err)
            }
        }
    }
}

/// Exit code for an error; warnings do not fail the run
pub fn exit_code(err: &ReachabilityError) -> i32 {
    match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

/// Load the components to classify.
///
/// An explicit components file wins; otherwise the dependencies declared in
/// the source directory's package.json are used.
pub fn load_components(settings: &Settings) -> Result<Vec<Component>> {
    match &settings.components_file {
        Some(path) => load_components_file(path),
        None => {
            let manifest = PackageJsonParser::load_from_dir(&settings.source_dir)?;
            let selection = DependencySelection {
                dev: settings.include_dev_deps,
                peer: settings.include_peer_deps,
                optional: settings.include_optional_deps,
            };
            Ok(PackageJsonParser::components(&manifest, selection))
        }
    }
}

/// Read a JSON components file: either an array or `{"components": [...]}`
pub fn load_components_file(path: &Path) -> Result<Vec<Component>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ReachabilityError::components_file_error(path, e.to_string()))?;
    let parsed: ComponentsFile = serde_json::from_str(&content).map_err(|e| {
        ReachabilityError::components_file_error(path, format!("expected a list of components: {}", e))
    })?;
    let components = match parsed {
        ComponentsFile::List(components) | ComponentsFile::Wrapped { components } => components,
    };
    if let Some(unnamed) = components.iter().position(|c| c.name.trim().is_empty()) {
        return Err(ReachabilityError::components_file_error(
            path,
            format!("component #{} has an empty name", unnamed + 1),
        ));
    }
    Ok(components)
}

/// Load components and run the engine with the configured progress display
pub fn run_analysis(settings: &Settings) -> Result<Vec<ComponentResult>> {
    let components = load_components(settings)?;
    info!(components = components.len(), "loaded components");

    let engine = ReachabilityEngine::new(EngineOptions::from(settings));
    if !settings.show_progress || settings.quiet {
        return engine.analyze(&settings.source_dir, &components);
    }

    let reporter = Arc::new(ProgressReporter::new(settings.quiet, settings.verbose));
    reporter.start(0, &format!("Parsing {}", settings.source_dir.display()));
    let outcome = engine.analyze_with_progress(
        &settings.source_dir,
        &components,
        create_progress_callback(reporter.clone()),
    );
    match &outcome {
        Ok(results) => reporter.finish(&format!("Classified {} components", results.len())),
        Err(_) => reporter.clear(),
    }
    outcome
}

/// Format results and write them to stdout or the output file
pub fn write_results(settings: &Settings, results: &[ComponentResult]) -> Result<()> {
    // Escape codes never go into files
    let use_colors = settings.use_colors && settings.output_file.is_none() && should_use_colors();
    let formatter = create_formatter(settings.output_format, use_colors, settings.verbose, settings.quiet);
    let content = formatter.format(results)?;
    create_writer(settings.output_file.as_ref()).write(&content)?;
    if let Some(path) = &settings.output_file {
        info!(path = %path.display(), "results written");
    }
    Ok(())
}

/// Create the default configuration file unless one already exists
pub fn init_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Configuration file already exists at: {}", config_path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    crate::config::parser::create_default_config(config_path)?;

    println!("Created default configuration file at: {}", config_path.display());
    println!("\nAvailable options:");
    println!("  - source_dir: Directory to analyze");
    println!("  - components_file: JSON file with the components to classify");
    println!("  - ignore_patterns: Glob patterns for files to skip");
    println!("  - max_reexport_depth: Barrel files followed per import");
    println!("  - concurrency: Files parsed in parallel");
    println!("  - output_format: Output format (text, json)");
    Ok(())
}
