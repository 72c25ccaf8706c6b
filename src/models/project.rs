//! Parse results for a whole source tree

use super::call_graph::FileCallGraph;
use super::import::ImportRecord;
use serde::Serialize;
use std::path::PathBuf;

/// Owned results of parsing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Path relative to the analyzed root, used in locations
    pub display_path: PathBuf,
    pub imports: Vec<ImportRecord>,
    pub call_graph: FileCallGraph,
}

/// A file excluded from evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Parsed files of a source tree, sorted by path
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    pub root: PathBuf,
    pub files: Vec<ParsedFile>,
    pub skipped: Vec<SkippedFile>,
    /// Number of files discovered, parsed or not
    pub discovered: usize,
    /// False when a timeout stopped scheduling parses
    pub completed: bool,
}

impl ProjectAnalysis {
    /// Whether any file computes a module specifier at runtime
    pub fn has_dynamic_imports(&self) -> bool {
        self.files.iter().any(|f| f.call_graph.has_dynamic_imports())
    }

    pub fn file(&self, path: &std::path::Path) -> Option<&ParsedFile> {
        self.files
            .binary_search_by(|f| f.path.as_path().cmp(path))
            .ok()
            .map(|idx| &self.files[idx])
    }
}
