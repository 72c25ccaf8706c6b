//! Shared helpers

pub mod path_resolver;

pub use path_resolver::{is_relative_specifier, is_source_file, normalize_path, PathResolver};
