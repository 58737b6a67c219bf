//! A single registered module text with a line index.

use crate::span::FileId;
use tandem_common::ContentHash;
use std::path::PathBuf;

/// A module description registered in the [`SourceDb`](crate::SourceDb).
///
/// Line-start offsets are computed once so diagnostics can map byte offsets
/// to line/column pairs with a binary search.
pub struct SourceFile {
    /// Identifier within the owning database.
    pub id: FileId,
    /// Filesystem path, or a synthetic name such as `<golden>` for text
    /// that never touched the disk.
    pub path: PathBuf,
    /// Full text.
    pub content: String,
    line_starts: Vec<u32>,
    /// Fingerprint of `content`.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a source file, indexing line starts and hashing the content.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        let content_hash = ContentHash::of_text(&content);
        Self {
            id,
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed `(line, column)`.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let col = byte_offset - self.line_starts[line_idx] + 1;
        ((line_idx as u32) + 1, col)
    }

    /// Returns the full text of the line containing `byte_offset`, without
    /// its trailing newline.
    pub fn line_text(&self, byte_offset: u32) -> &str {
        let (line, _) = self.line_col(byte_offset);
        let start = self.line_starts[(line - 1) as usize] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.content.len(), |next| (*next as usize).saturating_sub(1));
        self.content[start..end].trim_end_matches('\r')
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("adder.v"),
            content.to_string(),
        )
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("module a;\ninput x;\nendmodule");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(10), (2, 1));
        assert_eq!(f.line_col(16), (2, 7));
        assert_eq!(f.line_col(19), (3, 1));
    }

    #[test]
    fn line_text_strips_newline() {
        let f = make_file("module a;\r\ninput x;\nendmodule");
        assert_eq!(f.line_text(2), "module a;");
        assert_eq!(f.line_text(12), "input x;");
        assert_eq!(f.line_text(22), "endmodule");
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_text(0), "");
    }

    #[test]
    fn snippet_and_hash() {
        let f = make_file("output [3:0] q;");
        assert_eq!(f.snippet(13, 14), "q");
        assert_eq!(f.content_hash, ContentHash::of_text("output [3:0] q;"));
    }
}
