//! Core functionality for discovery, tracing and classification

pub mod analyzer;
pub mod cache;
pub mod classifier;
pub mod discovery;
pub mod parallel;
pub mod reexport_tracer;

pub use analyzer::{EngineOptions, ReachabilityEngine};
pub use cache::{CacheStats, ParseCache};
pub use classifier::{classify, Classifier};
pub use discovery::FileDiscovery;
pub use parallel::ProgressUpdate;
pub use reexport_tracer::{ReexportTracer, TraceIndex};
