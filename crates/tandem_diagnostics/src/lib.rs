//! Diagnostics for module-interface extraction.
//!
//! Findings that do not stop extraction (a port declared twice, an `inout`
//! that the harness cannot drive) are reported as [`Diagnostic`]s into a
//! thread-safe [`DiagnosticSink`] and rendered rustc-style by the
//! [`TerminalRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use sink::DiagnosticSink;
