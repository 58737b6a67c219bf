//! The set of module texts known to one extraction session.

use crate::source_file::SourceFile;
use crate::span::{FileId, Span};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Owns every registered module text and resolves spans against them.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Reads a module description from disk and registers it.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path, content))
    }

    /// Registers in-memory text under a display name.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the [`SourceFile`] for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this database.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Number of registered texts.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves a span to line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the text covered by `span`.
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

/// A span expressed as 1-indexed line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path or display name of the text.
    pub file_path: PathBuf,
    /// First line (1-indexed).
    pub start_line: u32,
    /// First column (1-indexed).
    pub start_col: u32,
    /// Last line (1-indexed).
    pub end_line: u32,
    /// Last column (1-indexed).
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}
