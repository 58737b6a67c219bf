//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use tandem_source::Span;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Additional context attached to another finding.
    Note,
    /// Extraction continued, but the result may not be what the author meant.
    Warning,
    /// The module could not be processed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Whether a label marks the main location or supporting context.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// Underlined with `^`.
    Primary,
    /// Underlined with `-`.
    Secondary,
}

/// An annotated span inside a diagnostic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The annotated span.
    pub span: Span,
    /// Text printed next to the underline.
    pub message: String,
    /// Primary or secondary.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// A finding with a code, a message, a location and optional notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// Stable identifier of the finding kind.
    pub code: DiagnosticCode,
    /// One-line summary.
    pub message: String,
    /// Where the finding was detected.
    pub primary_span: Span,
    /// Extra annotated locations.
    pub labels: Vec<Label>,
    /// `note:` footers.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Error, code, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Warning, code, message, span)
    }

    /// Adds a label.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
