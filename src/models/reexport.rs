//! Results of following barrel re-exports back to an external module

use super::import::{BoundName, SourceLocation};
use super::result::{AnalysisWarning, WarningCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One relative import traced to the external module it ultimately names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReexportChain {
    /// Never a relative specifier
    pub original_module: String,
    /// Barrel files traversed, in order
    pub file_chain: Vec<PathBuf>,
    /// Names at `original_module` proven to flow through; empty means every name
    pub exported_names: Vec<String>,
    /// `imported` is the name at `original_module`, `local` the name the tracing importer asked for
    pub forwarded: Vec<BoundName>,
    pub depth_reached: usize,
    /// Some hop was an `export *`
    pub through_star: bool,
    /// The re-export declaration that names `original_module`
    pub origin: SourceLocation,
}

impl ReexportChain {
    /// Whether every name of the importer flows through unchanged
    pub fn forwards_everything(&self) -> bool {
        self.forwarded.is_empty()
    }

    /// Name at the original module for a name the importer requested
    pub fn origin_name<'a>(&'a self, requested: &'a str) -> Option<&'a str> {
        if self.forwards_everything() {
            return Some(requested);
        }
        self.forwarded
            .iter()
            .find(|b| b.local == requested)
            .map(|b| b.imported.as_str())
    }

    /// `a.ts -> b.ts -> lodash`
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .file_chain
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        parts.push(self.original_module.clone());
        parts.join(" -> ")
    }
}

/// Everything one trace produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceOutcome {
    pub chains: Vec<ReexportChain>,
    pub warnings: Vec<AnalysisWarning>,
    /// Sorted files of each cycle, in the order its `circular_reexport` warning was pushed
    pub cycles: Vec<Vec<PathBuf>>,
}

impl TraceOutcome {
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.warnings.is_empty()
    }

    /// Circular re-export warnings paired with the files of their cycle
    pub fn cycle_warnings(&self) -> impl Iterator<Item = (&[PathBuf], &AnalysisWarning)> {
        self.cycles.iter().map(Vec::as_slice).zip(
            self.warnings
                .iter()
                .filter(|w| w.code == WarningCode::CircularReexport),
        )
    }
}
