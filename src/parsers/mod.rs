//! Parsing functionality
//!
//! The oxc wrapper, the import resolver and the call-graph builder that
//! together reduce one source file to a `ParsedFile`, plus package.json
//! parsing for deriving components.

pub mod ast_parser;
pub mod call_graph_builder;
pub mod import_resolver;
pub mod location;
pub mod package_json;

pub use ast_parser::{ASTParser, AllocatorPool};
pub use call_graph_builder::CallGraphBuilder;
pub use import_resolver::ImportResolver;
pub use location::{LineIndex, Locator};
pub use package_json::{DependencySelection, PackageJsonParser};
