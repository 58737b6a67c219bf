//! Source text management and span tracking for module descriptions.
//!
//! Golden and candidate module texts are registered in a [`SourceDb`] so
//! that extractor findings can point at the exact declaration they concern.
//! [`Span`]s are byte ranges tagged with a [`FileId`]; [`ResolvedSpan`] turns
//! them into `path:line:col` for display.

#![warn(missing_docs)]

pub mod source_db;
pub mod source_file;
pub mod span;

pub use source_db::{ResolvedSpan, SourceDb};
pub use source_file::SourceFile;
pub use span::{FileId, Span};
