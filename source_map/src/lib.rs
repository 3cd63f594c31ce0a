//! Source mapping for script programs
//!
//! Tokens handed to the analyzer only carry a 1-based line and column. This
//! crate turns those into spans that diagnostics can point at, and keeps the
//! original script text around so a snippet can be printed under an error.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// A 1-based line/column position in a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of script text inside one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub file_id: FileId,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition, file_id: FileId) -> Self {
        Self { start, end, file_id }
    }

    /// Span covering `width` columns starting at `line:column`.
    ///
    /// A zero width still covers one column so an underline is always drawn.
    pub fn covering(line: usize, column: usize, width: usize, file_id: FileId) -> Self {
        Self {
            start: SourcePosition::new(line, column),
            end: SourcePosition::new(line, column + width.max(1)),
            file_id,
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Number of columns underlined on the first line
    pub fn width(&self) -> usize {
        if self.is_single_line() {
            self.end.column.saturating_sub(self.start.column).max(1)
        } else {
            1
        }
    }
}

/// Identifier of a file registered in a [`SourceMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// A loaded script with precomputed line offsets
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: String, content: String) -> Self {
        let line_starts = line_starts(&content);
        Self {
            name,
            content,
            line_starts,
        }
    }

    /// Text of a 1-based line without its terminator
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 || line_number > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line_number - 1];
        let end = self
            .line_starts
            .get(line_number)
            .copied()
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Registry of the scripts taking part in one analysis run
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: HashMap<FileId, SourceFile>,
    next_id: usize,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        let file_id = FileId(self.next_id);
        self.next_id += 1;
        self.files
            .insert(file_id, SourceFile::new(name.into(), content.into()));
        file_id
    }

    /// Read a script from disk and register it under its display path
    pub fn load_file(&mut self, path: &Path) -> io::Result<FileId> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_file(path.display().to_string(), content))
    }

    /// Register a file name with no text, for diagnostics without snippets
    pub fn add_placeholder(&mut self, name: impl Into<String>) -> FileId {
        self.add_file(name, String::new())
    }

    pub fn get_file(&self, file_id: FileId) -> Option<&SourceFile> {
        self.files.get(&file_id)
    }

    pub fn get_line(&self, file_id: FileId, line_number: usize) -> Option<&str> {
        self.get_file(file_id)?.get_line(line_number)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        source
            .char_indices()
            .filter(|&(_, ch)| ch == '\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_line() {
        let mut source_map = SourceMap::new();
        let file_id = source_map.add_file("main.script", "var x INTEGER\r\nprint x\nx = 1");

        assert_eq!(source_map.get_line(file_id, 1), Some("var x INTEGER"));
        assert_eq!(source_map.get_line(file_id, 2), Some("print x"));
        assert_eq!(source_map.get_line(file_id, 3), Some("x = 1"));
        assert_eq!(source_map.get_line(file_id, 4), None);
        assert_eq!(source_map.get_line(file_id, 0), None);
    }

    #[test]
    fn test_span_width() {
        let file_id = FileId::new(0);
        assert_eq!(SourceSpan::covering(3, 5, 4, file_id).width(), 4);
        // zero-width tokens still get one column
        assert_eq!(SourceSpan::covering(3, 5, 0, file_id).width(), 1);

        let multi = SourceSpan::new(
            SourcePosition::new(1, 4),
            SourcePosition::new(2, 2),
            file_id,
        );
        assert!(!multi.is_single_line());
        assert_eq!(multi.width(), 1);
    }

    #[test]
    fn test_placeholder_has_no_lines() {
        let mut source_map = SourceMap::new();
        let file_id = source_map.add_placeholder("program.json");
        assert_eq!(source_map.get_file(file_id).unwrap().name, "program.json");
        assert_eq!(source_map.get_line(file_id, 1), Some(""));
        assert_eq!(source_map.get_line(file_id, 2), None);
    }

    #[test]
    fn test_multiple_files() {
        let mut source_map = SourceMap::new();
        let first = source_map.add_file("a.script", "a");
        let second = source_map.add_file("b.script", "b");

        assert_eq!(source_map.len(), 2);
        assert_ne!(first, second);
        assert_eq!(second.as_usize(), 1);
    }
}
