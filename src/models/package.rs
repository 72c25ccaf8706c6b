//! Project manifest data extracted from package.json

use serde::{Deserialize, Serialize};

/// Which dependency table an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    Production,
    Development,
    Peer,
    Optional,
}

/// Individual dependency entry with name and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub name: String,
    pub version_spec: String,
    pub kind: DependencyKind,
}

/// The parts of package.json the engine cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Production entries first, each table sorted by name
    pub dependencies: Vec<DependencyEntry>,
}

impl PackageManifest {
    pub fn dependencies_of(&self, kind: DependencyKind) -> impl Iterator<Item = &DependencyEntry> {
        self.dependencies.iter().filter(move |d| d.kind == kind)
    }

    pub fn total_count(&self) -> usize {
        self.dependencies.len()
    }
}
