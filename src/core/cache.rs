//! Import cache shared by re-export traces
//!
//! Project files arrive already parsed. Files reached only through a barrel
//! (outside the discovered set, or skipped by ignore patterns) are parsed on
//! first use. A file that fails to parse caches as having no imports.

use crate::models::import::ImportRecord;
use crate::models::project::ParsedFile;
use crate::parsers::ast_parser::ASTParser;
use crate::utils::path_resolver::normalize_path;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe map from file to its import records
#[derive(Clone)]
pub struct ParseCache {
    entries: Arc<DashMap<PathBuf, Arc<Vec<ImportRecord>>>>,
    parser: ASTParser,
    root: PathBuf,
    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,
}

impl ParseCache {
    pub fn new(parser: ASTParser, root: impl Into<PathBuf>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            parser,
            root: root.into(),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Insert the imports of already parsed files
    pub fn seed(&self, files: &[ParsedFile]) {
        for file in files {
            self.entries
                .insert(normalize_path(&file.path), Arc::new(file.imports.clone()));
        }
    }

    /// Imports of `path`, parsing it if it has not been seen
    pub fn imports(&self, path: &Path) -> Arc<Vec<ImportRecord>> {
        let key = normalize_path(path);
        if let Some(cached) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(&cached);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let imports = match self.parser.parse_imports(&key, &self.display_path(&key)) {
            Ok(imports) => imports,
            Err(skipped) => {
                tracing::debug!(file = %skipped.path.display(), reason = %skipped.reason, "barrel file not parsed");
                Vec::new()
            }
        };

        // Two traces may race to parse the same file; the first insert wins
        Arc::clone(&self.entries.entry(key).or_insert_with(|| Arc::new(imports)))
    }

    /// Path relative to the analyzed root when it lies inside it
    pub fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lazy_parse_and_hits() {
        let dir = TempDir::new().unwrap();
        let barrel = dir.path().join("index.ts");
        fs::write(&barrel, "export { merge } from 'lodash';\n").unwrap();

        let cache = ParseCache::new(ASTParser::with_pool_size(1), dir.path());
        let first = cache.imports(&barrel);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].location.file, Path::new("index.ts"));

        let second = cache.imports(&barrel);
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_unparseable_file_has_no_imports() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.ts");
        fs::write(&broken, "export { from 'x'").unwrap();

        let cache = ParseCache::new(ASTParser::with_pool_size(1), dir.path());
        assert!(cache.imports(&broken).is_empty());
        assert!(cache.imports(&dir.path().join("missing.ts")).is_empty());
    }
}
