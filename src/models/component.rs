//! Declared dependencies and their known vulnerabilities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_functions: Vec<String>,
}

/// A declared dependency to classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Component {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ecosystem: None,
            vulnerabilities: Vec::new(),
        }
    }

    pub fn with_vulnerability(mut self, vulnerability: Vulnerability) -> Self {
        self.vulnerabilities.push(vulnerability);
        self
    }

    /// Union of affected functions across all vulnerabilities
    pub fn affected_functions(&self) -> BTreeSet<&str> {
        self.vulnerabilities
            .iter()
            .flat_map(|v| v.affected_functions.iter().map(String::as_str))
            .collect()
    }

    /// Whether an import specifier refers to this component.
    ///
    /// Exact name or `name/subpath`; scoped packages match the same way.
    pub fn matches_module(&self, specifier: &str) -> bool {
        if self.name.is_empty() {
            return false;
        }
        match specifier.strip_prefix(self.name.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }
}
