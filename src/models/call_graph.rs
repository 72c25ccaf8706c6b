//! Per-file call graph

use super::import::SourceLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallKind {
    PlainCall,
    ConstructorCall,
    MethodCall,
    ComputedCall,
}

/// One detected invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSite {
    pub callee: String,
    pub receiver_name: Option<String>,
    pub kind: CallKind,
    pub location: SourceLocation,
}

impl CallSite {
    /// `receiver.callee` when there is a receiver, otherwise the bare callee
    pub fn qualified_name(&self) -> String {
        match &self.receiver_name {
            Some(receiver) => format!("{}.{}", receiver, self.callee),
            None => self.callee.clone(),
        }
    }
}

/// Kinds of dynamic code execution the builder recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DynamicCodeKind {
    Eval,
    FunctionConstructor,
    StringTimer,
    IndirectEval,
    ComputedImport,
    ComputedRequire,
}

impl DynamicCodeKind {
    /// Computed module specifiers hide imports from static analysis
    pub fn hides_imports(&self) -> bool {
        matches!(self, DynamicCodeKind::ComputedImport | DynamicCodeKind::ComputedRequire)
    }
}

impl fmt::Display for DynamicCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DynamicCodeKind::Eval => "eval",
            DynamicCodeKind::FunctionConstructor => "Function constructor",
            DynamicCodeKind::StringTimer => "string timer",
            DynamicCodeKind::IndirectEval => "indirect eval",
            DynamicCodeKind::ComputedImport => "computed import",
            DynamicCodeKind::ComputedRequire => "computed require",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicCodeWarning {
    pub kind: DynamicCodeKind,
    pub location: SourceLocation,
    pub context: String,
}

/// Everything the call-graph builder learns about one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCallGraph {
    pub call_sites: Vec<CallSite>,
    pub called_names: BTreeSet<String>,
    pub referenced_names: BTreeSet<String>,
    pub dynamic_code: Vec<DynamicCodeWarning>,
}

impl FileCallGraph {
    pub fn is_called(&self, name: &str) -> bool {
        self.called_names.contains(name)
    }

    pub fn is_referenced(&self, name: &str) -> bool {
        self.referenced_names.contains(name)
    }

    /// Members called through `local.`, first segment only.
    ///
    /// `ns.a.b()` registers `ns.a.b`, so `ns` yields `a`.
    pub fn called_members_of<'a>(&'a self, local: &str) -> impl Iterator<Item = &'a str> + 'a {
        members_with_prefix(&self.called_names, local)
    }

    /// Members read or called through `local.`, first segment only
    pub fn referenced_members_of<'a>(&'a self, local: &str) -> impl Iterator<Item = &'a str> + 'a {
        members_with_prefix(&self.referenced_names, local)
    }

    /// Whether `local` or any `local.member` is invoked
    pub fn is_invoked(&self, local: &str) -> bool {
        self.is_called(local) || self.called_members_of(local).next().is_some()
    }

    pub fn has_dynamic_imports(&self) -> bool {
        self.dynamic_code.iter().any(|w| w.kind.hides_imports())
    }
}

fn members_with_prefix<'a>(names: &'a BTreeSet<String>, local: &str) -> impl Iterator<Item = &'a str> + 'a {
    let prefix = format!("{}.", local);
    let skip = prefix.len();
    names
        .range(prefix.clone()..)
        .take_while(move |name| name.starts_with(&prefix))
        .filter_map(move |name| name[skip..].split('.').next().filter(|segment| !segment.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_invoked() {
        let mut graph = FileCallGraph::default();
        graph.called_names.insert("axios.get".to_string());
        graph.referenced_names.insert("axios".to_string());
        graph.referenced_names.insert("config.timeout".to_string());

        assert!(graph.is_invoked("axios"));
        assert!(!graph.is_invoked("config"));
        assert_eq!(graph.referenced_members_of("config").collect::<Vec<_>>(), vec!["timeout"]);
    }

    #[test]
    fn test_called_members_of() {
        let mut graph = FileCallGraph::default();
        graph.called_names.insert("_".to_string());
        graph.called_names.insert("_.merge".to_string());
        graph.called_names.insert("_.fp.map".to_string());
        graph.called_names.insert("__x.merge".to_string());
        graph.called_names.insert("a.b".to_string());

        let members: Vec<&str> = graph.called_members_of("_").collect();
        assert_eq!(members, vec!["fp", "merge"]);
        assert_eq!(graph.called_members_of("missing").count(), 0);
    }

    #[test]
    fn test_qualified_name() {
        let site = CallSite {
            callee: "get".to_string(),
            receiver_name: Some("axios".to_string()),
            kind: CallKind::MethodCall,
            location: SourceLocation {
                file: "a.ts".into(),
                line: 1,
                column: 1,
                snippet: String::new(),
            },
        };
        assert_eq!(site.qualified_name(), "axios.get");
    }
}
