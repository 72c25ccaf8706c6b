//! Module path resolution utilities
//!
//! Only relative specifiers are resolved; bare specifiers name external
//! modules and are never looked up on disk.

use dashmap::DashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Recognized source extensions, in resolution order
pub const SOURCE_EXTENSIONS: [&str; 8] = ["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Whether a module specifier points into the local tree
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Whether a path is an analyzable source file.
///
/// Declaration files carry no runtime code and are excluded.
pub fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Resolve `.` and `..` components without touching the file system
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// TypeScript siblings tried when an import names the compiled `.js` file
fn typescript_siblings(ext: &str) -> &'static [&'static str] {
    match ext {
        "js" => &["ts", "tsx"],
        "jsx" => &["tsx"],
        "mjs" => &["mts"],
        "cjs" => &["cts"],
        _ => &[],
    }
}

/// Relative import resolver with a shared existence cache
#[derive(Clone, Default)]
pub struct PathResolver {
    file_exists_cache: Arc<DashMap<PathBuf, bool>>,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a relative specifier imported from `from` (a file).
    ///
    /// Candidates, first existing file wins: the literal path, the TypeScript
    /// sibling of a `.js`-family path, each source extension appended, then
    /// `<path>/index.<ext>`.
    pub fn resolve_relative(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        if !is_relative_specifier(specifier) {
            return None;
        }

        let base = from.parent().unwrap_or(from);
        let candidate = normalize_path(&base.join(specifier));

        self.candidates(&candidate)
            .into_iter()
            .find(|path| self.check_file_exists(path))
    }

    fn candidates(&self, candidate: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![candidate.to_path_buf()];

        if let Some(ext) = candidate.extension().and_then(|e| e.to_str()) {
            for sibling in typescript_siblings(ext) {
                candidates.push(candidate.with_extension(sibling));
            }
        }

        let candidate_str = candidate.to_string_lossy();
        for ext in SOURCE_EXTENSIONS {
            candidates.push(PathBuf::from(format!("{}.{}", candidate_str, ext)));
        }

        for ext in SOURCE_EXTENSIONS {
            candidates.push(candidate.join(format!("index.{}", ext)));
        }

        candidates
    }

    /// Check if a regular file exists, with caching
    pub fn check_file_exists(&self, path: &Path) -> bool {
        if let Some(cached) = self.file_exists_cache.get(path) {
            return *cached;
        }

        let exists = path.is_file();
        self.file_exists_cache.insert(path.to_path_buf(), exists);
        exists
    }

    /// Clear the existence cache
    pub fn clear_cache(&self) {
        self.file_exists_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_relative_specifier() {
        assert!(is_relative_specifier("./utils"));
        assert!(is_relative_specifier("../lib/index.js"));
        assert!(is_relative_specifier("."));
        assert!(is_relative_specifier(".."));
        assert!(!is_relative_specifier("lodash"));
        assert!(!is_relative_specifier("@scope/pkg"));
        assert!(!is_relative_specifier(".hidden"));
        assert!(!is_relative_specifier("/abs/path"));
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("src/app.ts")));
        assert!(is_source_file(Path::new("src/app.cjs")));
        assert!(!is_source_file(Path::new("src/types.d.ts")));
        assert!(!is_source_file(Path::new("data.json")));
        assert!(!is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_path(Path::new("a/./b")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_resolve_relative_candidates() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("app.ts"), "").unwrap();
        fs::write(root.join("utils.ts"), "").unwrap();
        fs::write(root.join("helpers.js"), "").unwrap();
        fs::write(root.join("compiled.ts"), "").unwrap();
        fs::write(root.join("lib/index.tsx"), "").unwrap();

        let resolver = PathResolver::new();
        let from = root.join("app.ts");

        assert_eq!(resolver.resolve_relative("./utils", &from), Some(root.join("utils.ts")));
        assert_eq!(resolver.resolve_relative("./helpers.js", &from), Some(root.join("helpers.js")));
        assert_eq!(resolver.resolve_relative("./compiled.js", &from), Some(root.join("compiled.ts")));
        assert_eq!(resolver.resolve_relative("./lib", &from), Some(root.join("lib/index.tsx")));
        assert_eq!(resolver.resolve_relative("./missing", &from), None);
        assert_eq!(resolver.resolve_relative("lodash", &from), None);
    }

    #[test]
    fn test_resolve_parent_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/index.ts"), "").unwrap();
        fs::write(root.join("src/nested/deep.ts"), "").unwrap();

        let resolver = PathResolver::new();
        let from = root.join("src/nested/deep.ts");
        assert_eq!(resolver.resolve_relative("..", &from), Some(root.join("src/index.ts")));
    }
}
