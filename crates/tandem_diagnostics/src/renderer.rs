//! Terminal rendering of diagnostics.

use crate::diagnostic::{Diagnostic, LabelStyle, Severity};
use tandem_source::SourceDb;

/// Formats diagnostics for some output target.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;

    /// Renders every diagnostic, separated by blank lines.
    fn render_all(&self, diags: &[Diagnostic], source_db: &SourceDb) -> String {
        diags
            .iter()
            .map(|d| self.render(d, source_db))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders diagnostics in a rustc-like layout:
///
/// ```text
/// warning[W101]: port `a` declared more than once
///   --> cand.v:4:14
///   |
/// 4 |     input b, a;
///   |              ^ later declaration wins
///   = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to wrap the severity header in ANSI colors.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let tag = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return tag;
        }
        let ansi = match diag.severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        };
        format!("{ansi}{tag}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("  --> {resolved}\n"));

            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            let carets = "^".repeat(diag.primary_span.len().max(1) as usize);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!(
                "{line_num} | {}\n",
                file.line_text(diag.primary_span.start)
            ));
            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));

            for label in diag
                .labels
                .iter()
                .filter(|l| l.style == LabelStyle::Secondary && !l.span.is_dummy())
            {
                let at = source_db.resolve_span(label.span);
                let text = source_db.snippet(label.span);
                out.push_str(&format!("{padding} = {}: {at} `{text}`\n", label.message));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        out
    }
}
