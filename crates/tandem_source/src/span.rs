//! File identifiers and byte-offset ranges.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a text registered in a [`SourceDb`](crate::SourceDb).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Identifier used for text that has no backing source, such as
    /// synthesized harness lines.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A half-open byte range `[start, end)` within one source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The text this span belongs to.
    pub file: FileId,
    /// Byte offset of the first byte (inclusive).
    pub start: u32,
    /// Byte offset one past the last byte (exclusive).
    pub end: u32,
}

impl Span {
    /// Span used when no source location is available.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a new span.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the spans belong to different files.
    pub fn merge(self, other: Span) -> Span {
        assert_eq!(
            self.file, other.file,
            "cannot merge spans from different files"
        );
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this span has no backing source.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }

    /// Byte range suitable for slicing the source text.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}
