//! Data models shared by the engine, the configuration layer and the CLI

pub mod call_graph;
pub mod component;
pub mod config;
pub mod import;
pub mod package;
pub mod project;
pub mod reexport;
pub mod result;

pub use call_graph::{CallKind, CallSite, DynamicCodeKind, DynamicCodeWarning, FileCallGraph};
pub use component::{Component, Vulnerability};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use import::{BoundName, ImportKind, ImportRecord, SourceLocation};
pub use project::{ParsedFile, ProjectAnalysis, SkippedFile};
pub use reexport::{ReexportChain, TraceOutcome};
pub use result::{
    AnalysisWarning, ComponentResult, Confidence, ReachabilityStatus, UsageInfo, WarningCode,
    WarningSeverity,
};
