//! Normalized import records produced by the import resolver

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Imported-name marker for bindings that capture a whole module.
pub const NAMESPACE_NAME: &str = "*";
/// Imported-name marker for default bindings.
pub const DEFAULT_NAME: &str = "default";

/// How a module is brought into a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    NamedImport,
    DefaultImport,
    NamespaceImport,
    SideEffectOnly,
    DynamicImport,
    CommonJsRequire,
    TypeOnlyImport,
    /// `export { a } from 'x'`
    ReExport,
    /// `export * from 'x'` and `export * as ns from 'x'`
    ReExportAll,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::NamedImport => "namedImport",
            ImportKind::DefaultImport => "defaultImport",
            ImportKind::NamespaceImport => "namespaceImport",
            ImportKind::SideEffectOnly => "sideEffectOnly",
            ImportKind::DynamicImport => "dynamicImport",
            ImportKind::CommonJsRequire => "commonJsRequire",
            ImportKind::TypeOnlyImport => "typeOnlyImport",
            ImportKind::ReExport => "reExport",
            ImportKind::ReExportAll => "reExportAll",
        }
    }

    /// Whether this record comes from an `export … from` declaration
    pub fn is_reexport(&self) -> bool {
        matches!(self, ImportKind::ReExport | ImportKind::ReExportAll)
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local binding and the exported name it aliases.
///
/// For re-exports `imported` is the name in the source module and `local`
/// is the name the barrel exports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundName {
    pub imported: String,
    pub local: String,
}

impl BoundName {
    pub fn new(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
        }
    }

    pub fn namespace(local: impl Into<String>) -> Self {
        Self::new(NAMESPACE_NAME, local)
    }

    pub fn is_namespace(&self) -> bool {
        self.imported == NAMESPACE_NAME
    }

    pub fn is_default(&self) -> bool {
        self.imported == DEFAULT_NAME
    }

    /// Namespace and default bindings cannot be proven unused from member calls alone
    pub fn is_whole_module(&self) -> bool {
        self.is_namespace() || self.is_default()
    }
}

/// A position in a source file, 1-based
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub snippet: String,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// One import, require or re-export site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub module_name: String,
    pub kind: ImportKind,
    pub bound_names: Vec<BoundName>,
    pub is_type_only: bool,
    pub location: SourceLocation,
}

impl ImportRecord {
    pub fn new(module_name: impl Into<String>, kind: ImportKind, location: SourceLocation) -> Self {
        Self {
            module_name: module_name.into(),
            is_type_only: kind == ImportKind::TypeOnlyImport,
            kind,
            bound_names: Vec::new(),
            location,
        }
    }

    /// Add a binding, keeping first-seen order and dropping duplicates
    pub fn bind(&mut self, name: BoundName) {
        if !self.bound_names.contains(&name) {
            self.bound_names.push(name);
        }
    }

    pub fn with_binding(mut self, name: BoundName) -> Self {
        self.bind(name);
        self
    }

    pub fn is_reexport(&self) -> bool {
        self.kind.is_reexport()
    }

    pub fn is_relative(&self) -> bool {
        crate::utils::path_resolver::is_relative_specifier(&self.module_name)
    }

    /// Binding whose local name is `local`, if any
    pub fn binding_for_local(&self, local: &str) -> Option<&BoundName> {
        self.bound_names.iter().find(|b| b.local == local)
    }
}
