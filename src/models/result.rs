//! Per-component classification results

use super::component::Component;
use super::import::{ImportKind, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachabilityStatus {
    Reachable,
    Imported,
    Indirect,
    NotReachable,
    Unknown,
}

impl fmt::Display for ReachabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReachabilityStatus::Reachable => "reachable",
            ReachabilityStatus::Imported => "imported",
            ReachabilityStatus::Indirect => "indirect",
            ReachabilityStatus::NotReachable => "not_reachable",
            ReachabilityStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningSeverity::Info => f.write_str("info"),
            WarningSeverity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// Computed `import()`/`require()` somewhere in the project
    DynamicImport,
    /// `eval`, `Function` constructor, string timers
    DynamicCode,
    NamespaceImport,
    StarImport,
    BarrelFile,
    CircularReexport,
    MaxDepthReached,
    SideEffectImport,
    PartialAnalysis,
    SkippedFiles,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::DynamicImport => "dynamic_import",
            WarningCode::DynamicCode => "dynamic_code",
            WarningCode::NamespaceImport => "namespace_import",
            WarningCode::StarImport => "star_import",
            WarningCode::BarrelFile => "barrel_file",
            WarningCode::CircularReexport => "circular_reexport",
            WarningCode::MaxDepthReached => "max_depth_reached",
            WarningCode::SideEffectImport => "side_effect_import",
            WarningCode::PartialAnalysis => "partial_analysis",
            WarningCode::SkippedFiles => "skipped_files",
        }
    }

    pub fn default_severity(&self) -> WarningSeverity {
        match self {
            WarningCode::BarrelFile | WarningCode::SideEffectImport | WarningCode::SkippedFiles => {
                WarningSeverity::Info
            }
            _ => WarningSeverity::Warning,
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A limitation of the analysis that the caller should know about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub severity: WarningSeverity,
}

impl AnalysisWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            severity: code.default_severity(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Identity used for deduplication
    pub fn key(&self) -> (WarningCode, Option<&SourceLocation>) {
        (self.code, self.location.as_ref())
    }
}

/// How a component is used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    pub import_styles: Vec<ImportKind>,
    pub used_members: Vec<String>,
    pub referenced_members: Vec<String>,
    pub vulnerable_functions_called: Vec<String>,
    pub locations: Vec<SourceLocation>,
}

/// Verdict for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResult {
    pub component: Component,
    pub status: ReachabilityStatus,
    pub confidence: Confidence,
    pub usage: UsageInfo,
    pub warnings: Vec<AnalysisWarning>,
    pub notes: Vec<String>,
}

impl ComponentResult {
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn warning_count(&self, code: WarningCode) -> usize {
        self.warnings.iter().filter(|w| w.code == code).count()
    }

    pub fn is_vulnerable_reachable(&self) -> bool {
        !self.usage.vulnerable_functions_called.is_empty()
    }
}
