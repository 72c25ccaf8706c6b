//! Byte offset to line/column conversion

use crate::models::import::SourceLocation;
use oxc_span::Span;
use std::path::{Path, PathBuf};

/// Longest snippet kept in a location, in characters
pub const MAX_SNIPPET_CHARS: usize = 120;

/// Line start offsets of one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((idx + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// 1-based line and column (in characters) of a byte offset
    pub fn line_column(&self, offset: u32, source: &str) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(0) => 0,
            Err(idx) => idx - 1,
        };

        let line_start = self.line_starts[line_idx] as usize;
        let end = (offset as usize).min(source.len());
        let column = source
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);

        (line_idx as u32 + 1, column as u32 + 1)
    }

    /// The trimmed text of a 1-based line, truncated to `MAX_SNIPPET_CHARS`
    pub fn snippet(&self, line: u32, source: &str) -> String {
        let idx = line.saturating_sub(1) as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return String::new();
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next as usize)
            .unwrap_or(source.len());

        let text = source.get(start as usize..end).unwrap_or("").trim();
        text.chars().take(MAX_SNIPPET_CHARS).collect()
    }
}

/// Builds `SourceLocation`s for one file
pub struct Locator<'s> {
    source: &'s str,
    file: PathBuf,
    index: LineIndex,
}

impl<'s> Locator<'s> {
    pub fn new(source: &'s str, file: &Path) -> Self {
        Self {
            source,
            file: file.to_path_buf(),
            index: LineIndex::new(source),
        }
    }

    pub fn locate(&self, span: Span) -> SourceLocation {
        let (line, column) = self.index.line_column(span.start, self.source);
        SourceLocation {
            file: self.file.clone(),
            line,
            column,
            snippet: self.index.snippet(line, self.source),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }
}
