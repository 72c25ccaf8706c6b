//! Following relative imports through barrel files
//!
//! A trace starts at one relative import and walks the re-export declarations
//! of the files it reaches until they name an external module. Names are
//! followed through renames, so a chain knows which export of the external
//! module the importer actually receives. The set of files on the current
//! branch guards against cycles; a cycle or an over-long chain ends that
//! branch with a warning.

use super::cache::ParseCache;
use crate::models::import::{BoundName, ImportKind, ImportRecord, SourceLocation, NAMESPACE_NAME};
use crate::models::project::ProjectAnalysis;
use crate::models::reexport::{ReexportChain, TraceOutcome};
use crate::models::result::{AnalysisWarning, WarningCode};
use crate::utils::path_resolver::{normalize_path, PathResolver};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 5;

/// A name the importer asked for and what it is called in the current file
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameFlow {
    requested: String,
    current: String,
}

/// `None` follows every export
type Flows = Option<Vec<NameFlow>>;

#[derive(Default)]
struct TraceState {
    chain: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    through_star: bool,
}

/// Re-export tracer over a shared parse cache
pub struct ReexportTracer<'c> {
    cache: &'c ParseCache,
    resolver: &'c PathResolver,
    max_depth: usize,
}

impl<'c> ReexportTracer<'c> {
    pub fn new(cache: &'c ParseCache, resolver: &'c PathResolver, max_depth: usize) -> Self {
        Self {
            cache,
            resolver,
            max_depth,
        }
    }

    /// Trace one import of `from_file`.
    ///
    /// Non-relative and type-only records trace to nothing, as do specifiers
    /// that resolve to no file.
    pub fn trace(&self, record: &ImportRecord, from_file: &Path) -> TraceOutcome {
        let mut outcome = TraceOutcome::default();
        if !record.is_relative() || record.is_type_only {
            return outcome;
        }

        let Some(target) = self.resolver.resolve_relative(&record.module_name, from_file) else {
            debug!(specifier = %record.module_name, from = %from_file.display(), "unresolved relative import");
            return outcome;
        };

        let mut state = TraceState::default();
        state.visited.insert(normalize_path(from_file));
        self.visit(&target, requested_flows(record), &record.location, &mut state, &mut outcome);
        outcome
    }

    fn visit(
        &self,
        file: &Path,
        flows: Flows,
        via: &SourceLocation,
        state: &mut TraceState,
        outcome: &mut TraceOutcome,
    ) {
        let file = normalize_path(file);

        if state.visited.contains(&file) {
            let mut cycle: Vec<String> = state
                .chain
                .iter()
                .map(|p| self.cache.display_path(p).display().to_string())
                .collect();
            cycle.push(self.cache.display_path(&file).display().to_string());

            // The same cycle reached from another entry point has the same members
            let start = state.chain.iter().position(|p| *p == file);
            let mut members: Vec<PathBuf> = state.chain[start.unwrap_or(0)..]
                .iter()
                .map(|p| self.cache.display_path(p))
                .collect();
            if start.is_none() {
                members.push(self.cache.display_path(&file));
            }
            members.sort();
            members.dedup();
            outcome.cycles.push(members);

            outcome.warnings.push(
                AnalysisWarning::new(
                    WarningCode::CircularReexport,
                    format!("Circular re-export: {}", cycle.join(" -> ")),
                )
                .at(via.clone()),
            );
            return;
        }

        if state.chain.len() >= self.max_depth {
            outcome.warnings.push(
                AnalysisWarning::new(
                    WarningCode::MaxDepthReached,
                    format!(
                        "Re-export chain longer than {} files; stopped at {}",
                        self.max_depth,
                        self.cache.display_path(&file).display()
                    ),
                )
                .at(via.clone()),
            );
            return;
        }

        state.visited.insert(file.clone());
        state.chain.push(file.clone());

        let imports = self.cache.imports(&file);
        for record in imports.iter().filter(|r| r.is_reexport() && !r.is_type_only) {
            let Some((next, star)) = forward(flows.as_deref(), record) else {
                continue;
            };

            let outer_star = state.through_star;
            state.through_star |= star;

            if record.is_relative() {
                match self.resolver.resolve_relative(&record.module_name, &file) {
                    Some(target) => self.visit(&target, next, &record.location, state, outcome),
                    None => debug!(
                        specifier = %record.module_name,
                        from = %file.display(),
                        "unresolved relative re-export"
                    ),
                }
            } else {
                outcome.chains.push(self.chain_for(record, next, state));
            }

            state.through_star = outer_star;
        }

        state.chain.pop();
        state.visited.remove(&file);
    }

    fn chain_for(&self, record: &ImportRecord, flows: Flows, state: &TraceState) -> ReexportChain {
        let forwarded: Vec<BoundName> = flows
            .unwrap_or_default()
            .into_iter()
            .map(|flow| BoundName::new(flow.current, flow.requested))
            .collect();

        let mut exported_names: Vec<String> = forwarded
            .iter()
            .filter(|b| b.imported != NAMESPACE_NAME)
            .map(|b| b.imported.clone())
            .collect();
        exported_names.sort();
        exported_names.dedup();

        ReexportChain {
            original_module: record.module_name.clone(),
            file_chain: state.chain.iter().map(|p| self.cache.display_path(p)).collect(),
            exported_names,
            forwarded,
            depth_reached: state.chain.len(),
            through_star: state.through_star,
            origin: record.location.clone(),
        }
    }
}

/// Names the importer asks for; `None` for whole-module and unbound imports
fn requested_flows(record: &ImportRecord) -> Flows {
    if record.bound_names.is_empty() || record.bound_names.iter().any(BoundName::is_namespace) {
        return None;
    }
    Some(
        record
            .bound_names
            .iter()
            .map(|b| NameFlow {
                requested: b.imported.clone(),
                current: b.imported.clone(),
            })
            .collect(),
    )
}

/// Flows that survive one re-export declaration, and whether it was a star.
///
/// `None` when the declaration forwards none of the requested names.
fn forward(flows: Option<&[NameFlow]>, record: &ImportRecord) -> Option<(Flows, bool)> {
    match record.kind {
        ImportKind::ReExportAll => match record.bound_names.first() {
            // export * from 'x'
            None => Some((flows.map(<[NameFlow]>::to_vec), true)),
            // export * as ns from 'x'
            Some(ns) => {
                let hits: Vec<NameFlow> = match flows {
                    None => vec![NameFlow {
                        requested: ns.local.clone(),
                        current: NAMESPACE_NAME.to_string(),
                    }],
                    Some(flows) => flows
                        .iter()
                        .filter(|f| f.current == ns.local)
                        .map(|f| NameFlow {
                            requested: f.requested.clone(),
                            current: NAMESPACE_NAME.to_string(),
                        })
                        .collect(),
                };
                if hits.is_empty() {
                    None
                } else if record.is_relative() {
                    // The namespace exposes every export of the next file
                    Some((None, false))
                } else {
                    Some((Some(hits), false))
                }
            }
        },
        ImportKind::ReExport => {
            if record.bound_names.is_empty() {
                return None;
            }
            let hits: Vec<NameFlow> = match flows {
                None => record
                    .bound_names
                    .iter()
                    .map(|b| NameFlow {
                        requested: b.local.clone(),
                        current: b.imported.clone(),
                    })
                    .collect(),
                Some(flows) => flows
                    .iter()
                    .flat_map(|f| {
                        record
                            .bound_names
                            .iter()
                            .filter(move |b| b.local == f.current)
                            .map(move |b| NameFlow {
                                requested: f.requested.clone(),
                                current: b.imported.clone(),
                            })
                    })
                    .collect(),
            };
            if hits.is_empty() {
                None
            } else {
                Some((Some(hits), false))
            }
        }
        _ => None,
    }
}

/// One traced import of a project file
#[derive(Debug, Clone)]
pub struct TracedImport {
    /// Index into `ProjectAnalysis::files`
    pub file_index: usize,
    /// Index into that file's imports
    pub record_index: usize,
    pub outcome: TraceOutcome,
}

/// Traces of every relative import in a project
#[derive(Debug, Clone, Default)]
pub struct TraceIndex {
    pub traced: Vec<TracedImport>,
    /// Cycle warnings once per set of files, depth warnings once per location
    pub warnings: Vec<AnalysisWarning>,
}

impl TraceIndex {
    /// Trace every relative, non-type-only import that is not itself a
    /// re-export. Barrel declarations are covered by the traces that pass
    /// through them. A cycle entered from several importers is reported once.
    ///
    /// Runs on the current rayon pool.
    pub fn build(project: &ProjectAnalysis, tracer: &ReexportTracer<'_>) -> Self {
        let targets: Vec<(usize, usize)> = project
            .files
            .iter()
            .enumerate()
            .flat_map(|(file_index, file)| {
                file.imports
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.is_relative() && !r.is_type_only && !r.is_reexport())
                    .map(move |(record_index, _)| (file_index, record_index))
            })
            .collect();

        let traced: Vec<TracedImport> = targets
            .into_par_iter()
            .map(|(file_index, record_index)| {
                let file = &project.files[file_index];
                let outcome = tracer.trace(&file.imports[record_index], &file.path);
                TracedImport {
                    file_index,
                    record_index,
                    outcome,
                }
            })
            .filter(|t| !t.outcome.is_empty())
            .collect();

        let mut seen_cycles = HashSet::new();
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        for outcome in traced.iter().map(|t| &t.outcome) {
            for (members, warning) in outcome.cycle_warnings() {
                if seen_cycles.insert(members) {
                    warnings.push(warning.clone());
                }
            }
            for warning in outcome
                .warnings
                .iter()
                .filter(|w| w.code != WarningCode::CircularReexport)
            {
                if seen.insert((warning.code, warning.location.clone())) {
                    warnings.push(warning.clone());
                }
            }
        }

        Self { traced, warnings }
    }

    /// Locations of re-export declarations that some chain ends at
    pub fn chain_origins(&self) -> HashSet<&SourceLocation> {
        self.traced
            .iter()
            .flat_map(|t| &t.outcome.chains)
            .map(|c| &c.origin)
            .collect()
    }

    pub fn chain_count(&self) -> usize {
        self.traced.iter().map(|t| t.outcome.chains.len()).sum()
    }
}
