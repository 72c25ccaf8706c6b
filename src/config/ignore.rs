//! `.reachabilityignore` handling

use crate::error::{ReachabilityError, Result};
use std::fs;
use std::path::Path;

/// Ignore file looked up in the source directory
pub const IGNORE_FILE: &str = ".reachabilityignore";

/// Glob patterns from the ignore file of `source_dir`.
///
/// One pattern per line; blank lines and `#` comments are skipped. A missing
/// file yields no patterns.
pub fn load_ignore_file(source_dir: &Path) -> Result<Vec<String>> {
    let path = source_dir.join(IGNORE_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| ReachabilityError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let patterns = parse_ignore_content(&content);
    tracing::debug!(file = %path.display(), count = patterns.len(), "loaded ignore patterns");
    Ok(patterns)
}

pub fn parse_ignore_content(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
