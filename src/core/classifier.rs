//! Reachability classification of one component
//!
//! Evidence comes from two places: imports in project files that name the
//! component directly, and re-export chains that end at it. Each piece of
//! evidence is checked against the importing file's call graph. The strongest
//! evidence decides the status:
//!
//! | evidence                                         | status        | confidence |
//! |--------------------------------------------------|---------------|------------|
//! | a named binding is called                        | reachable     | high       |
//! | namespace/default used, dynamic load, barrel call | reachable     | medium     |
//! | imported, nothing observed                       | imported      | medium     |
//! | only reached through a barrel                    | indirect      | medium     |
//! | nothing                                          | not_reachable | high       |
//!
//! Calling one of a vulnerability's affected functions raises confidence to
//! high. Computed imports anywhere in the project lower `not_reachable` to
//! medium.

use super::reexport_tracer::TraceIndex;
use crate::models::component::Component;
use crate::models::import::{BoundName, ImportKind, ImportRecord, SourceLocation, DEFAULT_NAME, NAMESPACE_NAME};
use crate::models::project::{ParsedFile, ProjectAnalysis};
use crate::models::reexport::ReexportChain;
use crate::models::result::{
    AnalysisWarning, ComponentResult, Confidence, ReachabilityStatus, UsageInfo, WarningCode,
};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default)]
struct Evidence {
    /// A named binding is called
    named_call: bool,
    /// A namespace or default binding is called or referenced
    whole_module_use: bool,
    /// `import('x')` with nothing bound
    dynamic_load: bool,
    /// A name received through a barrel is called
    barrel_call: bool,
    direct_import: bool,
    chain: bool,
    /// A chain that contributed passed through `export *`
    star_chain: Option<SourceLocation>,

    import_styles: BTreeSet<ImportKind>,
    used: BTreeSet<String>,
    referenced: BTreeSet<String>,
    locations: Vec<SourceLocation>,
    touched_files: BTreeSet<usize>,
    warnings: Vec<AnalysisWarning>,
    namespace_warnings: Vec<AnalysisWarning>,
}

impl Evidence {
    fn saw(&mut self, file_index: usize, record: &ImportRecord) {
        self.import_styles.insert(record.kind);
        self.locations.push(record.location.clone());
        self.touched_files.insert(file_index);
    }
}

/// Classifies components against one analyzed project
pub struct Classifier<'p> {
    project: &'p ProjectAnalysis,
    traces: &'p TraceIndex,
    chain_origins: HashSet<&'p SourceLocation>,
    has_dynamic_imports: bool,
}

impl<'p> Classifier<'p> {
    pub fn new(project: &'p ProjectAnalysis, traces: &'p TraceIndex) -> Self {
        Self {
            project,
            traces,
            chain_origins: traces.chain_origins(),
            has_dynamic_imports: project.has_dynamic_imports(),
        }
    }

    pub fn classify(&self, component: &Component) -> ComponentResult {
        if self.project.files.is_empty() {
            return self.nothing_parsed(component);
        }

        let mut ev = Evidence::default();
        for (file_index, file) in self.project.files.iter().enumerate() {
            for record in &file.imports {
                if record.is_type_only || !component.matches_module(&record.module_name) {
                    continue;
                }
                // Already counted through the chain that ends here
                if record.is_reexport() && self.chain_origins.contains(&record.location) {
                    continue;
                }
                self.direct_evidence(&mut ev, component, file_index, file, record);
            }
        }

        for traced in &self.traces.traced {
            let file = &self.project.files[traced.file_index];
            let record = &file.imports[traced.record_index];
            for chain in &traced.outcome.chains {
                if component.matches_module(&chain.original_module) {
                    self.chain_evidence(&mut ev, traced.file_index, file, record, chain);
                }
            }
        }

        self.finish(component, ev)
    }

    fn direct_evidence(
        &self,
        ev: &mut Evidence,
        component: &Component,
        file_index: usize,
        file: &ParsedFile,
        record: &ImportRecord,
    ) {
        ev.direct_import = true;
        ev.saw(file_index, record);

        // A re-export no chain passes through is an import with no observed use
        if record.is_reexport() {
            return;
        }

        if record.bound_names.is_empty() {
            if record.kind == ImportKind::DynamicImport {
                ev.dynamic_load = true;
                ev.warnings.push(
                    AnalysisWarning::new(
                        WarningCode::DynamicImport,
                        format!("'{}' is loaded with import(); member usage is not tracked", record.module_name),
                    )
                    .at(record.location.clone()),
                );
            } else {
                ev.warnings.push(
                    AnalysisWarning::new(
                        WarningCode::SideEffectImport,
                        format!("'{}' is imported for its side effects only", record.module_name),
                    )
                    .at(record.location.clone()),
                );
            }
            return;
        }

        let graph = &file.call_graph;
        for binding in &record.bound_names {
            if binding.is_whole_module() {
                let called_self = graph.is_called(&binding.local);
                let members: Vec<&str> = graph.called_members_of(&binding.local).collect();

                if called_self || !members.is_empty() {
                    if called_self {
                        ev.used.insert(whole_module_call_name(component, record, binding));
                    }
                    ev.used.extend(members.into_iter().map(str::to_string));
                } else if graph.is_referenced(&binding.local) {
                    ev.referenced
                        .extend(graph.referenced_members_of(&binding.local).map(str::to_string));
                } else {
                    continue;
                }

                ev.whole_module_use = true;
                ev.namespace_warnings.push(namespace_warning(record, binding));
            } else if graph.is_invoked(&binding.local) {
                ev.named_call = true;
                ev.used.insert(binding.imported.clone());
            } else if graph.is_referenced(&binding.local) {
                ev.referenced.insert(binding.imported.clone());
            }
        }
    }

    fn chain_evidence(
        &self,
        ev: &mut Evidence,
        file_index: usize,
        file: &ParsedFile,
        record: &ImportRecord,
        chain: &ReexportChain,
    ) {
        ev.chain = true;
        ev.saw(file_index, record);
        ev.warnings.push(
            AnalysisWarning::new(
                WarningCode::BarrelFile,
                format!("'{}' is reached through re-exports: {}", chain.original_module, chain.describe()),
            )
            .at(record.location.clone()),
        );

        let graph = &file.call_graph;
        let mut called = false;
        for binding in &record.bound_names {
            if binding.is_namespace() {
                // Members of the barrel namespace are names the chain forwards
                for member in graph.called_members_of(&binding.local) {
                    if let Some(origin) = chain.origin_name(member) {
                        called = true;
                        ev.used.insert(member_name(origin, member));
                    }
                }
                for member in graph.referenced_members_of(&binding.local) {
                    if let Some(origin) = chain.origin_name(member) {
                        ev.referenced.insert(member_name(origin, member));
                    }
                }
                continue;
            }

            let Some(origin) = chain.origin_name(&binding.imported) else {
                continue;
            };
            if origin == NAMESPACE_NAME {
                // export * as ns from 'pkg'; `ns.fn()` calls pkg's `fn`
                for member in graph.called_members_of(&binding.local) {
                    called = true;
                    ev.used.insert(member.to_string());
                }
            } else if graph.is_invoked(&binding.local) {
                called = true;
                ev.used.insert(origin.to_string());
            } else if graph.is_referenced(&binding.local) {
                ev.referenced.insert(origin.to_string());
            }
        }

        ev.barrel_call |= called;
        if chain.through_star && ev.star_chain.is_none() {
            ev.star_chain = Some(chain.origin.clone());
        }
    }

    fn finish(&self, component: &Component, mut ev: Evidence) -> ComponentResult {
        let (status, mut confidence) = if ev.named_call {
            (ReachabilityStatus::Reachable, Confidence::High)
        } else if ev.whole_module_use || ev.dynamic_load || ev.barrel_call {
            (ReachabilityStatus::Reachable, Confidence::Medium)
        } else if ev.direct_import {
            (ReachabilityStatus::Imported, Confidence::Medium)
        } else if ev.chain {
            (ReachabilityStatus::Indirect, Confidence::Medium)
        } else if !self.project.completed {
            (ReachabilityStatus::Unknown, Confidence::Low)
        } else if self.has_dynamic_imports {
            (ReachabilityStatus::NotReachable, Confidence::Medium)
        } else {
            (ReachabilityStatus::NotReachable, Confidence::High)
        };

        let mut warnings = std::mem::take(&mut ev.warnings);
        let mut notes = Vec::new();

        if !ev.named_call && ev.whole_module_use {
            warnings.append(&mut ev.namespace_warnings);
        }
        let relied_on_barrel = !ev.named_call && !ev.whole_module_use && !ev.dynamic_load && !ev.direct_import;
        if let Some(origin) = ev.star_chain.take() {
            if relied_on_barrel || (ev.barrel_call && !ev.named_call) {
                warnings.push(
                    AnalysisWarning::new(
                        WarningCode::StarImport,
                        format!("'{}' is forwarded by an export * declaration", component.name),
                    )
                    .at(origin),
                );
            }
        }

        for &file_index in &ev.touched_files {
            for dynamic in &self.project.files[file_index].call_graph.dynamic_code {
                let code = if dynamic.kind.hides_imports() {
                    WarningCode::DynamicImport
                } else {
                    WarningCode::DynamicCode
                };
                warnings.push(
                    AnalysisWarning::new(code, format!("{}: {}", dynamic.kind, dynamic.context))
                        .at(dynamic.location.clone()),
                );
            }
        }

        match status {
            ReachabilityStatus::NotReachable if self.has_dynamic_imports => {
                let mut warning = AnalysisWarning::new(
                    WarningCode::DynamicImport,
                    format!("The project computes module names at runtime; imports of '{}' may be hidden", component.name),
                );
                if let Some(location) = self.first_computed_import() {
                    warning = warning.at(location.clone());
                }
                warnings.push(warning);
            }
            ReachabilityStatus::Unknown => {
                notes.push(format!(
                    "Analysis timed out after {} of {} files before any evidence for '{}' was found",
                    self.project.files.len(),
                    self.project.discovered,
                    component.name
                ));
            }
            _ => {}
        }

        if status != ReachabilityStatus::Reachable {
            warnings.extend(self.traces.warnings.iter().cloned());
        }

        if !self.project.completed && status != ReachabilityStatus::Unknown {
            warnings.push(AnalysisWarning::new(
                WarningCode::PartialAnalysis,
                format!(
                    "Analysis timed out after {} of {} files; the result may be incomplete",
                    self.project.files.len(),
                    self.project.discovered
                ),
            ));
        }
        if !self.project.skipped.is_empty() {
            warnings.push(skipped_warning(self.project.skipped.len()));
        }

        let affected = component.affected_functions();
        let vulnerable_functions_called: Vec<String> = ev
            .used
            .iter()
            .filter(|name| affected.contains(name.as_str()))
            .cloned()
            .collect();
        if !vulnerable_functions_called.is_empty() {
            confidence = Confidence::High;
            notes.push(format!(
                "Calls affected function(s): {}",
                vulnerable_functions_called.join(", ")
            ));
        } else if status == ReachabilityStatus::Reachable && !affected.is_empty() {
            notes.push(format!(
                "None of the affected functions ({}) were observed being called",
                affected.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        match status {
            ReachabilityStatus::Imported => notes.push("Imported, but no use was observed".to_string()),
            ReachabilityStatus::Indirect => {
                notes.push("Only reached through re-exports; no use was observed".to_string())
            }
            _ => {}
        }

        let referenced_members = ev.referenced.difference(&ev.used).cloned().collect();
        let mut locations = ev.locations;
        locations.sort();
        locations.dedup();

        ComponentResult {
            component: component.clone(),
            status,
            confidence,
            usage: UsageInfo {
                import_styles: ev.import_styles.into_iter().collect(),
                used_members: ev.used.into_iter().collect(),
                referenced_members,
                vulnerable_functions_called,
                locations,
            },
            warnings: dedup_warnings(warnings),
            notes,
        }
    }

    fn nothing_parsed(&self, component: &Component) -> ComponentResult {
        let note = if self.project.discovered == 0 {
            "No source files were found".to_string()
        } else {
            format!("None of the {} discovered source files could be parsed", self.project.discovered)
        };

        let mut warnings = Vec::new();
        if !self.project.skipped.is_empty() {
            warnings.push(skipped_warning(self.project.skipped.len()));
        }

        ComponentResult {
            component: component.clone(),
            status: ReachabilityStatus::Unknown,
            confidence: Confidence::Low,
            usage: UsageInfo::default(),
            warnings,
            notes: vec![note],
        }
    }

    fn first_computed_import(&self) -> Option<&SourceLocation> {
        self.project
            .files
            .iter()
            .flat_map(|f| &f.call_graph.dynamic_code)
            .find(|d| d.kind.hides_imports())
            .map(|d| &d.location)
    }
}

/// Classify one component against a project and its traces
pub fn classify(component: &Component, project: &ProjectAnalysis, traces: &TraceIndex) -> ComponentResult {
    Classifier::new(project, traces).classify(component)
}

/// Member recorded when a whole-module binding is itself called.
///
/// `lodash/template` exports a single function named after its last path
/// segment. A CommonJS binding is named after the export it holds.
fn whole_module_call_name(component: &Component, record: &ImportRecord, binding: &BoundName) -> String {
    let subpath = record
        .module_name
        .strip_prefix(component.name.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.rsplit('/').find(|segment| !segment.is_empty()));
    if let Some(segment) = subpath {
        let stem = segment.split_once('.').map_or(segment, |(stem, _)| stem);
        return stem.to_string();
    }
    if binding.is_namespace() {
        return binding.local.clone();
    }
    DEFAULT_NAME.to_string()
}

fn member_name(origin: &str, member: &str) -> String {
    if origin == NAMESPACE_NAME {
        member.to_string()
    } else {
        origin.to_string()
    }
}

fn namespace_warning(record: &ImportRecord, binding: &BoundName) -> AnalysisWarning {
    let style = if binding.is_default() { "default" } else { "namespace" };
    AnalysisWarning::new(
        WarningCode::NamespaceImport,
        format!(
            "'{}' is used through the {} binding '{}'; individual members are inferred",
            record.module_name, style, binding.local
        ),
    )
    .at(record.location.clone())
}

fn skipped_warning(count: usize) -> AnalysisWarning {
    AnalysisWarning::new(
        WarningCode::SkippedFiles,
        format!("{} file(s) could not be parsed and were excluded", count),
    )
}

/// Keep the first warning per code and location
fn dedup_warnings(warnings: Vec<AnalysisWarning>) -> Vec<AnalysisWarning> {
    let mut seen = HashSet::new();
    warnings
        .into_iter()
        .filter(|w| seen.insert((w.code, w.location.clone())))
        .collect()
}
