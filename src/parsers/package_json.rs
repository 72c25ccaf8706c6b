//! Package.json parsing functionality
//!
//! When no components file is given, the declared dependencies of the
//! project's package.json become the components to classify.

use crate::error::{ReachabilityError, Result};
use crate::models::component::Component;
use crate::models::package::{DependencyEntry, DependencyKind, PackageManifest};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Which optional dependency tables to turn into components
#[derive(Debug, Clone, Copy)]
pub struct DependencySelection {
    pub dev: bool,
    pub peer: bool,
    pub optional: bool,
}

impl Default for DependencySelection {
    fn default() -> Self {
        Self {
            dev: true,
            peer: true,
            optional: true,
        }
    }
}

/// Parser for package.json files
pub struct PackageJsonParser;

impl PackageJsonParser {
    /// Parse package.json content into a manifest
    pub fn parse(content: &str) -> Result<PackageManifest> {
        let json_value: Value = serde_json::from_str(content)
            .map_err(|e| ReachabilityError::json_parse_error("package.json", e))?;

        let obj = match json_value {
            Value::Object(obj) => obj,
            _ => {
                return Err(ReachabilityError::InvalidPackageJson {
                    path: "package.json".into(),
                    message: "Root value is not an object".into(),
                });
            }
        };

        let mut manifest = PackageManifest {
            name: Self::extract_optional_string(&obj, "name"),
            version: Self::extract_optional_string(&obj, "version"),
            dependencies: Vec::new(),
        };

        for (field, kind) in [
            ("dependencies", DependencyKind::Production),
            ("devDependencies", DependencyKind::Development),
            ("peerDependencies", DependencyKind::Peer),
            ("optionalDependencies", DependencyKind::Optional),
        ] {
            if let Some(deps) = obj.get(field) {
                manifest
                    .dependencies
                    .extend(Self::extract_dependencies(field, deps, kind)?);
            }
        }

        Ok(manifest)
    }

    /// Parse package.json file from a path
    pub fn parse_file(path: &Path) -> Result<PackageManifest> {
        let content = std::fs::read_to_string(path).map_err(ReachabilityError::io_error)?;

        Self::parse(&content).map_err(|e| match e {
            ReachabilityError::JsonParse { source, .. } => ReachabilityError::JsonParse {
                file: path.to_path_buf(),
                source,
            },
            ReachabilityError::InvalidPackageJson { message, .. } => {
                ReachabilityError::InvalidPackageJson {
                    path: path.to_path_buf(),
                    message,
                }
            }
            _ => e,
        })
    }

    /// Load the manifest of a source directory.
    ///
    /// A missing manifest is fatal: without it there is nothing to classify.
    pub fn load_from_dir(dir: &Path) -> Result<PackageManifest> {
        let path = dir.join("package.json");
        if !path.is_file() {
            return Err(ReachabilityError::PackageJsonNotFound {
                path: dir.to_path_buf(),
            });
        }
        Self::parse_file(&path)
    }

    /// Turn manifest entries into components, first occurrence wins
    pub fn components(manifest: &PackageManifest, selection: DependencySelection) -> Vec<Component> {
        let mut seen = HashSet::new();
        manifest
            .dependencies
            .iter()
            .filter(|dep| match dep.kind {
                DependencyKind::Production => true,
                DependencyKind::Development => selection.dev,
                DependencyKind::Peer => selection.peer,
                DependencyKind::Optional => selection.optional,
            })
            .filter(|dep| seen.insert(dep.name.clone()))
            .map(|dep| {
                let mut component = Component::new(dep.name.clone(), dep.version_spec.clone());
                component.ecosystem = Some("npm".to_string());
                component
            })
            .collect()
    }

    /// Extract dependencies from a JSON value
    fn extract_dependencies(
        field: &str,
        deps_json: &Value,
        kind: DependencyKind,
    ) -> Result<Vec<DependencyEntry>> {
        let map = match deps_json {
            Value::Object(map) => map,
            _ => {
                return Err(ReachabilityError::InvalidPackageJson {
                    path: "package.json".into(),
                    message: format!("Field '{}' is not an object", field),
                });
            }
        };

        Ok(map
            .iter()
            .filter_map(|(name, version)| {
                version.as_str().map(|version_str| DependencyEntry {
                    name: name.clone(),
                    version_spec: version_str.to_string(),
                    kind,
                })
            })
            .collect())
    }

    /// Extract an optional string field from a JSON object
    fn extract_optional_string(obj: &Map<String, Value>, field: &str) -> Option<String> {
        match obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }
}
