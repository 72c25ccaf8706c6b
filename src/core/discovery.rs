//! Source file discovery
//!
//! Walks the source tree with walkdir, pruning dependency and build output
//! directories, and keeps JavaScript/TypeScript sources that no ignore
//! pattern excludes.

use crate::error::{try_with_recovery, ReachabilityError, Result, ResultExt};
use crate::utils::path_resolver::is_source_file;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage", ".next", "out"];

/// Finds the source files of a project
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    root: PathBuf,
    patterns: Vec<Pattern>,
}

impl FileDiscovery {
    /// Compile ignore patterns for a root directory.
    ///
    /// Patterns match against the path relative to `root`, or against the
    /// bare file or directory name.
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: &[String]) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            patterns: compile_patterns(ignore_patterns)?,
        })
    }

    /// Source files under the root, sorted by path.
    ///
    /// Unreadable entries are logged and skipped.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            let failed_at = entry.as_ref().err().map(|err| err.path().unwrap_or(self.root.as_path()).to_path_buf());
            let entry = try_with_recovery(|| entry.with_file_context(failed_at.as_deref().unwrap_or(self.root.as_path())))?;
            if let Some(entry) = entry {
                if entry.file_type().is_file() && is_source_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }

        files.sort();
        tracing::debug!(root = %self.root.display(), count = files.len(), "discovered source files");
        Ok(files)
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        if entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| DEFAULT_IGNORED_DIRS.contains(&name))
        {
            return true;
        }
        self.is_excluded(entry.path())
    }

    /// Check if a path matches any ignore pattern
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let name = path.file_name().map(Path::new);
        let options = MatchOptions {
            require_literal_separator: false,
            ..MatchOptions::default()
        };

        self.patterns.iter().any(|pattern| {
            pattern.matches_path_with(relative, options)
                || name.is_some_and(|name| pattern.matches_path_with(name, options))
        })
    }
}

/// Compile glob patterns, failing on the first invalid one
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p.trim_end_matches('/')).map_err(|source| ReachabilityError::GlobPattern { source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_sources_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/b.ts");
        touch(root, "src/a.js");
        touch(root, "src/types.d.ts");
        touch(root, "README.md");
        touch(root, "node_modules/lodash/index.js");
        touch(root, "dist/bundle.js");
        touch(root, "lib/util.mjs");

        let discovery = FileDiscovery::new(root, &[]).unwrap();
        assert_eq!(
            relative(root, discovery.discover().unwrap()),
            vec!["lib/util.mjs", "src/a.js", "src/b.ts"]
        );
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/app.ts");
        touch(root, "src/app.test.ts");
        touch(root, "fixtures/sample.js");
        touch(root, "scripts/gen.js");

        let patterns = vec!["*.test.ts".to_string(), "fixtures/".to_string(), "scripts/**".to_string()];
        let discovery = FileDiscovery::new(root, &patterns).unwrap();
        assert_eq!(relative(root, discovery.discover().unwrap()), vec!["src/app.ts"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FileDiscovery::new("/tmp", &["[".to_string()]);
        assert!(matches!(result, Err(ReachabilityError::GlobPattern { .. })));
    }

    #[test]
    fn test_root_named_like_ignored_dir_is_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        touch(&root, "index.ts");

        let discovery = FileDiscovery::new(&root, &[]).unwrap();
        assert_eq!(discovery.discover().unwrap().len(), 1);
    }
}
