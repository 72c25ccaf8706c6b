//! Reachability analysis of a project directory
//!
//! The engine discovers source files, parses them on a bounded rayon pool,
//! traces relative imports through barrel files and classifies every
//! component against the result. Parsed files and traces are shared by all
//! components of one run.

use super::cache::ParseCache;
use super::classifier::Classifier;
use super::discovery::FileDiscovery;
use super::parallel::{bounded_pool, parallel_process_with_deadline, ProgressUpdate};
use super::reexport_tracer::{ReexportTracer, TraceIndex, DEFAULT_MAX_DEPTH};
use crate::error::{ReachabilityError, Result};
use crate::models::component::Component;
use crate::models::config::Settings;
use crate::models::project::{ProjectAnalysis, SkippedFile};
use crate::models::result::ComponentResult;
use crate::parsers::ast_parser::ASTParser;
use crate::utils::path_resolver::{normalize_path, PathResolver};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Tunables of one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub concurrency: usize,
    pub max_reexport_depth: usize,
    pub ignore_patterns: Vec<String>,
    /// Stop scheduling parses after this long
    pub timeout: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_reexport_depth: DEFAULT_MAX_DEPTH,
            ignore_patterns: Vec::new(),
            timeout: None,
        }
    }
}

impl From<&Settings> for EngineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            concurrency: settings.concurrency,
            max_reexport_depth: settings.max_reexport_depth,
            ignore_patterns: settings.ignore_patterns.clone(),
            timeout: settings.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Reachability analysis engine
pub struct ReachabilityEngine {
    options: EngineOptions,
    parser: ASTParser,
    resolver: PathResolver,
}

impl ReachabilityEngine {
    pub fn new(options: EngineOptions) -> Self {
        let parser = ASTParser::with_pool_size(options.concurrency.max(1));
        Self {
            options,
            parser,
            resolver: PathResolver::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Classify `components` against the sources under `source_dir`.
    ///
    /// Results come back in the order of `components`.
    pub fn analyze(&self, source_dir: &Path, components: &[Component]) -> Result<Vec<ComponentResult>> {
        self.analyze_with_progress(source_dir, components, |_| {})
    }

    /// Analyze with progress reporting
    pub fn analyze_with_progress<P>(
        &self,
        source_dir: &Path,
        components: &[Component],
        progress_callback: P,
    ) -> Result<Vec<ComponentResult>>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let started = Instant::now();
        let project = self.analyze_project_with_progress(source_dir, progress_callback)?;
        let results = self.classify_project(&project, components)?;

        info!(
            files = project.files.len(),
            skipped = project.skipped.len(),
            components = components.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );
        Ok(results)
    }

    /// Discover and parse the sources under `source_dir`
    pub fn analyze_project(&self, source_dir: &Path) -> Result<ProjectAnalysis> {
        self.analyze_project_with_progress(source_dir, |_| {})
    }

    fn analyze_project_with_progress<P>(&self, source_dir: &Path, progress_callback: P) -> Result<ProjectAnalysis>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let root = canonical_root(source_dir)?;
        let deadline = self.options.timeout.map(|t| Instant::now() + t);

        let files = FileDiscovery::new(&root, &self.options.ignore_patterns)?.discover()?;
        let discovered = files.len();
        info!(root = %root.display(), files = discovered, "parsing sources");

        let pool = bounded_pool(self.options.concurrency)?;
        let run = pool.install(|| {
            parallel_process_with_deadline(
                files,
                deadline,
                |path: PathBuf| {
                    let display = path.strip_prefix(&root).map(Path::to_path_buf).unwrap_or_else(|_| path.clone());
                    self.parser.parse_file(&path, &display)
                },
                progress_callback,
            )
        });

        let mut parsed = Vec::with_capacity(run.results.len());
        let mut skipped: Vec<SkippedFile> = Vec::new();
        for outcome in run.results {
            match outcome {
                Ok(file) => parsed.push(file),
                Err(skip) => {
                    debug!(file = %skip.path.display(), reason = %skip.reason, "file skipped");
                    skipped.push(skip);
                }
            }
        }
        parsed.sort_by(|a, b| a.path.cmp(&b.path));
        skipped.sort_by(|a, b| a.path.cmp(&b.path));

        if !run.completed {
            warn!(
                parsed = parsed.len() + skipped.len(),
                discovered, "timeout reached; analysis is partial"
            );
        }
        if !skipped.is_empty() {
            warn!(count = skipped.len(), "some files could not be parsed");
        }

        Ok(ProjectAnalysis {
            root,
            files: parsed,
            skipped,
            discovered,
            completed: run.completed,
        })
    }

    /// Trace barrels and classify components against a parsed project
    pub fn classify_project(&self, project: &ProjectAnalysis, components: &[Component]) -> Result<Vec<ComponentResult>> {
        let traces = self.trace_project(project)?;
        let classifier = Classifier::new(project, &traces);
        Ok(components.iter().map(|c| classifier.classify(c)).collect())
    }

    /// Trace every relative import of a project through its barrel files
    pub fn trace_project(&self, project: &ProjectAnalysis) -> Result<TraceIndex> {
        let cache = ParseCache::new(self.parser.clone(), &project.root);
        cache.seed(&project.files);
        let tracer = ReexportTracer::new(&cache, &self.resolver, self.options.max_reexport_depth);

        let pool = bounded_pool(self.options.concurrency)?;
        let traces = pool.install(|| TraceIndex::build(project, &tracer));

        let stats = cache.stats();
        debug!(
            chains = traces.chain_count(),
            warnings = traces.warnings.len(),
            cached_files = stats.entries,
            cache_hits = stats.hits,
            cache_hit_rate = stats.hit_rate(),
            "re-export tracing done"
        );
        Ok(traces)
    }
}

impl Default for ReachabilityEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

fn canonical_root(source_dir: &Path) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(ReachabilityError::InvalidPath {
            path: source_dir.to_path_buf(),
        });
    }
    let root = source_dir.canonicalize().unwrap_or_else(|_| source_dir.to_path_buf());
    Ok(normalize_path(&root))
}
