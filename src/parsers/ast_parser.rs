//! AST parser wrapper using OXC

use super::call_graph_builder::CallGraphBuilder;
use super::import_resolver::ImportResolver;
use super::location::Locator;
use crate::models::import::ImportRecord;
use crate::models::project::{ParsedFile, SkippedFile};
use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser, ParserReturn};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Thread-safe allocator pool for reuse across parses
#[derive(Clone)]
pub struct AllocatorPool {
    allocators: Arc<Mutex<Vec<Allocator>>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let allocators = (0..size).map(|_| Allocator::default()).collect();
        Self {
            allocators: Arc::new(Mutex::new(allocators)),
        }
    }

    /// Take an allocator from the pool
    pub fn take(&self) -> Option<Allocator> {
        self.allocators.lock().pop()
    }

    /// Reset an allocator and return it to the pool
    pub fn return_allocator(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        self.allocators.lock().len()
    }
}

/// AST parser using OXC
///
/// Every AST is reduced to owned records before its allocator goes back to
/// the pool. Parse errors and parser panics become `SkippedFile`s.
#[derive(Clone)]
pub struct ASTParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl ASTParser {
    /// Create a new AST parser
    pub fn new() -> Self {
        Self::with_pool_size(num_cpus::get())
    }

    pub fn with_pool_size(size: usize) -> Self {
        Self {
            parse_options: ParseOptions {
                allow_return_outside_function: true,
                ..ParseOptions::default()
            },
            allocator_pool: AllocatorPool::new(size),
        }
    }

    /// Parse a file into its imports and call graph.
    ///
    /// `display_path` is the path recorded in source locations.
    pub fn parse_file(&self, path: &Path, display_path: &Path) -> Result<ParsedFile, SkippedFile> {
        let source_text = fs::read_to_string(path).map_err(|e| skipped(path, format!("read error: {}", e)))?;

        self.with_program(path, &source_text, |ret| {
            let locator = Locator::new(&source_text, display_path);
            let imports = ImportResolver::resolve(&ret.program, &locator);
            let call_graph = CallGraphBuilder::build(&ret.program, &locator);
            ParsedFile {
                path: path.to_path_buf(),
                display_path: display_path.to_path_buf(),
                imports,
                call_graph,
            }
        })
    }

    /// Parse a file for its imports only
    pub fn parse_imports(&self, path: &Path, display_path: &Path) -> Result<Vec<ImportRecord>, SkippedFile> {
        let source_text = fs::read_to_string(path).map_err(|e| skipped(path, format!("read error: {}", e)))?;

        self.with_program(path, &source_text, |ret| {
            let locator = Locator::new(&source_text, display_path);
            ImportResolver::resolve(&ret.program, &locator)
        })
    }

    fn with_program<T, F>(&self, path: &Path, source_text: &str, f: F) -> Result<T, SkippedFile>
    where
        F: FnOnce(&ParserReturn<'_>) -> T,
    {
        let source_type = SourceType::from_path(path)
            .map_err(|_| skipped(path, "unsupported file type".to_string()))?;

        let allocator = self.allocator_pool.take().unwrap_or_default();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let ret = Parser::new(&allocator, source_text, source_type)
                .with_options(self.parse_options.clone())
                .parse();

            if let Some(error) = ret.errors.first() {
                return Err(syntax_error(error, ret.errors.len()));
            }
            if ret.panicked {
                return Err("parser aborted".to_string());
            }
            Ok(f(&ret))
        }));

        match outcome {
            Ok(result) => {
                self.allocator_pool.return_allocator(allocator);
                result.map_err(|reason| {
                    tracing::debug!(file = %path.display(), %reason, "skipping file");
                    skipped(path, reason)
                })
            }
            Err(_) => {
                // The allocator may hold a half-built AST; drop it
                tracing::warn!(file = %path.display(), "parser panicked");
                Err(skipped(path, "parser panicked".to_string()))
            }
        }
    }
}

impl Default for ASTParser {
    fn default() -> Self {
        Self::new()
    }
}

fn syntax_error(first: &OxcDiagnostic, count: usize) -> String {
    if count > 1 {
        format!("syntax error: {} (and {} more)", first, count - 1)
    } else {
        format!("syntax error: {}", first)
    }
}

fn skipped(path: &Path, reason: String) -> SkippedFile {
    SkippedFile {
        path: path.to_path_buf(),
        reason,
    }
}
